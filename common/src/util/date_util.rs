use chrono::DateTime;

pub fn now() -> i64 {
    let now = chrono::Local::now();
    now.timestamp()
}

pub fn time_to_str(time: i64) -> String {
    let t = DateTime::from_timestamp(time, 0).expect("非法的时间戳");
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}
