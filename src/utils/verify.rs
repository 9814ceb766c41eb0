use crate::compress::Decoded;
use crate::error::Result;
use crate::record::{project, Record};

/// decompress 之后完全读出的结果
#[derive(Debug)]
pub struct Restored {
    records: Vec<Record>,
    /// Avro 写入方 schema 的字段; 其它格式为 None
    fields: Option<Vec<String>>,
}

impl Restored {
    pub fn drain(decoded: Decoded) -> Result<Self> {
        match decoded {
            Decoded::Record(record) => Ok(Self {
                records: vec![record],
                fields: None,
            }),
            Decoded::Stream(stream) => {
                let fields = stream.field_names();
                let records = stream.collect::<Result<Vec<_>>>()?;
                Ok(Self {
                    records,
                    fields: Some(fields),
                })
            }
        }
    }

    /// 必须恰好一条记录; schema 编码只比较声明的字段
    pub fn matches(&self, original: &Record) -> bool {
        let [restored] = self.records.as_slice() else {
            return false;
        };
        match &self.fields {
            Some(fields) => *restored == project(original, fields),
            None => restored == original,
        }
    }
}

pub fn verify_roundtrip(original: &Record, decoded: Decoded) -> Result<bool> {
    Ok(Restored::drain(decoded)?.matches(original))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn materialized_record_must_match_exactly() {
        let original = record(json!({"subject": "hello", "size": 42}));

        assert!(verify_roundtrip(&original, Decoded::Record(original.clone())).unwrap());
        assert!(!verify_roundtrip(
            &original,
            Decoded::Record(record(json!({"subject": "hello"})))
        )
        .unwrap());
    }

    #[test]
    fn schema_fields_are_projected_before_comparing() {
        let original = record(json!({"subject": "hello", "to": ["a@x.com"], "size": 42}));
        let restored = Restored {
            records: vec![record(json!({"subject": "hello", "size": 42}))],
            fields: Some(vec!["subject".into(), "size".into()]),
        };
        assert!(restored.matches(&original));

        let two = Restored {
            records: vec![original.clone(), original.clone()],
            fields: None,
        };
        assert!(!two.matches(&original));
    }
}
