/// Source of ids for segments and music tracks created in a session.
pub trait IdGenerator: Send + Sync {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs. Used by live editing sessions so ids stay unique across
/// saves and reloads.
#[derive(Debug, Default)]
pub struct UuidIdGen;

impl IdGenerator for UuidIdGen {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Counting ids (`"0"`, `"1"`, ...) for tests and snapshots.
#[derive(Debug)]
pub struct SequentialIdGen {
    next: u64,
    prefix: String,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self {
            next: 0,
            prefix: String::new(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            next: 0,
            prefix: prefix.into(),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGen {
    fn next_id(&mut self) -> String {
        let id = self.next;
        self.next += 1;
        format!("{}{id}", self.prefix)
    }
}
