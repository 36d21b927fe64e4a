/// A decompressed file stored in an MPAK archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    data: Vec<u8>,
}

impl Entry {
    /// Create an entry from its stored name and decompressed bytes
    pub fn new(name: String, data: Vec<u8>) -> Self {
        Self { name, data }
    }

    /// In-archive name, in the case it was stored with
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decompressed payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Take ownership of the payload
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
