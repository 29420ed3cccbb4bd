use logfield_api::Handler;
use uuid::Uuid;

use crate::primitives::text;

pub fn handlers() -> Vec<Handler> {
    vec![text::<Uuid>("uuid")]
}

#[cfg(test)]
mod tests {
    use logfield_api::Subject;
    use serde_json::json;

    use super::*;

    #[test]
    fn uuid_is_hyphenated() {
        let id = Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8);
        let value = handlers()[0].converter().convert(&Subject::new(&id)).unwrap();
        assert_eq!(value, json!("67e55044-10b1-426f-9247-bb680e5fe0c8"));
    }
}
