use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 评分维度：投票值必须落在 [0, scale]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/metric.ts")]
pub struct Metric {
    pub id: i64,
    pub name: String,
    pub scale: i32,
}

impl Metric {
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite() && value >= 0.0 && value <= f64::from(self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_inclusive_bounds() {
        let metric = Metric {
            id: 1,
            name: "Composition".to_string(),
            scale: 10,
        };
        assert!(metric.accepts(0.0));
        assert!(metric.accepts(10.0));
        assert!(metric.accepts(7.5));
        assert!(!metric.accepts(-0.5));
        assert!(!metric.accepts(10.01));
        assert!(!metric.accepts(f64::NAN));
    }
}
