/// Identity string a client subscribes under (student or lecturer code).
pub type SubscriberId = String;

/// Transport-assigned identifier of one live client session.
pub type ConnectionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
