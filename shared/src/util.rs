/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a record key: 32 lowercase hex chars from a v4 UUID.
pub fn new_record_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
