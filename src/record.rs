use serde_json::{Map, Value};

/// 待序列化的记录: 字符串键到任意嵌套值
pub type Record = Map<String, Value>;

/// 只保留 `fields` 中列出的字段, 用于和 schema 编码后的结果比较
pub fn project<S: AsRef<str>>(record: &Record, fields: &[S]) -> Record {
    fields
        .iter()
        .filter_map(|field| {
            let key = field.as_ref();
            record.get(key).map(|value| (key.to_string(), value.clone()))
        })
        .collect()
}
