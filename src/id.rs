use compact_str::CompactString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Issue number within the blog repository (`#42`)
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct IssueNumber {
    value: u64,
}

/// Post identifier used as the key of `Counter` records.
///
/// This is the GitHub issue id, not the issue number.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PostId {
    value: u64,
}

/// LeanCloud object id
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct ObjectId {
    value: CompactString,
}

impl IssueNumber {
    pub fn new(number: u64) -> Self {
        Self { value: number }
    }

    pub fn get(self) -> u64 {
        self.value
    }
}

impl PostId {
    pub fn new(id: u64) -> Self {
        Self { value: id }
    }

    pub fn get(self) -> u64 {
        self.value
    }
}

impl ObjectId {
    pub fn new<S: Into<CompactString>>(id: S) -> Self {
        Self { value: id.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<u64> for IssueNumber {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<u64> for PostId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for IssueNumber {
    fn deserialize<D>(deserializer: D) -> Result<IssueNumber, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = u64::deserialize(deserializer)?;
        Ok(IssueNumber::new(number))
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D>(deserializer: D) -> Result<PostId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = u64::deserialize(deserializer)?;
        Ok(PostId::new(id))
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<ObjectId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = CompactString::deserialize(deserializer)?;
        Ok(ObjectId::new(id))
    }
}

impl Serialize for IssueNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value)
    }
}

impl Serialize for PostId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl std::fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
