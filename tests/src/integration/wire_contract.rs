//! # Wire Contract Tests
//!
//! JSON shapes exchanged with the orchestration layer:
//!
//! - Request: `query_fields` map of `{name, value, type}`, `provider_id`, `threshold`
//! - Response: `match_found`, `confidence`, `provider_id`, `matched_fields`,
//!   `bloom_filter` (hex), `metadata` (map)
//! - Exported filter: `size`, `hash_count`, `bits_hex`

#[cfg(test)]
mod tests {
    use pprl_engine::{
        ExportedBloomFilter, PprlApi, PprlRequest, PprlResponse, PprlService, SensitiveField,
    };
    use serde_json::{json, Value};

    use crate::fixtures::{init_tracing, record, request, test_config};

    fn service() -> PprlService {
        init_tracing();
        PprlService::new(test_config()).unwrap()
    }

    fn object_keys(value: &Value) -> Vec<String> {
        let mut keys: Vec<String> = value
            .as_object()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    #[test]
    fn request_parses_from_json() {
        let raw = json!({
            "query_fields": {
                "email": {"name": "email", "value": "a@b.com", "type": "exact"},
                "surname": {"name": "surname", "value": "Robert", "type": "phonetic"}
            },
            "provider_id": "dmv",
            "threshold": 0.8
        });

        let req: PprlRequest = serde_json::from_value(raw).unwrap();

        assert_eq!(req.query_fields.len(), 2);
        assert_eq!(req.provider_id, "dmv");
        assert!(service().validate_pprl_request(&req).is_ok());
    }

    #[test]
    fn request_with_unknown_field_type_is_rejected() {
        let raw = json!({
            "query_fields": {
                "email": {"name": "email", "value": "a@b.com", "type": "invalid"}
            },
            "provider_id": "dmv",
            "threshold": 0.8
        });

        let err = serde_json::from_value::<PprlRequest>(raw).unwrap_err();
        assert!(err.to_string().contains("Unknown field type: invalid"));
    }

    #[test]
    fn matched_response_shape() {
        let svc = service();
        let req = request(vec![SensitiveField::exact("email", "a@b.com")], 0.5);
        let candidates = vec![record("rec-1", vec![SensitiveField::exact("email", "a@b.com")])];

        let response = svc.perform_pprl(&req, &candidates);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            object_keys(&value),
            vec![
                "bloom_filter",
                "confidence",
                "match_found",
                "matched_fields",
                "metadata",
                "provider_id"
            ]
        );
        assert_eq!(value["match_found"], json!(true));
        assert_eq!(value["matched_fields"], json!(["email"]));
        assert_eq!(value["bloom_filter"].as_str().map(str::len), Some(250));

        let metadata = &value["metadata"];
        assert_eq!(metadata["query_field_count"], json!(1));
        assert_eq!(metadata["candidate_count"], json!(1));
        assert_eq!(metadata["matched_record_id"], json!("rec-1"));
        assert_eq!(metadata["matched_provider_id"], json!("dmv"));
        assert!(metadata["timestamp"].as_str().is_some());
    }

    #[test]
    fn unmatched_response_omits_match_metadata() {
        let svc = service();
        let req = request(vec![SensitiveField::exact("email", "a@b.com")], 0.5);

        let value = serde_json::to_value(svc.perform_pprl(&req, &[])).unwrap();

        assert_eq!(value["match_found"], json!(false));
        assert_eq!(value["confidence"], json!(0.0));
        assert_eq!(value["matched_fields"], json!([]));
        assert_eq!(
            object_keys(&value["metadata"]),
            vec![
                "candidate_count",
                "false_positive_rate",
                "query_field_count",
                "scan_id",
                "timestamp"
            ]
        );
    }

    #[test]
    fn response_round_trips_through_json() {
        let svc = service();
        let req = request(vec![SensitiveField::exact("email", "a@b.com")], 0.5);
        let candidates = vec![record("rec-1", vec![SensitiveField::exact("email", "a@b.com")])];
        let response = svc.perform_pprl(&req, &candidates);

        let json = serde_json::to_string(&response).unwrap();
        let parsed: PprlResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.match_found, response.match_found);
        assert_eq!(parsed.confidence, response.confidence);
        assert_eq!(parsed.matched_fields, response.matched_fields);
        assert_eq!(parsed.bloom_filter_hex, response.bloom_filter_hex);
        assert_eq!(parsed.metadata.scan_id, response.metadata.scan_id);
        assert_eq!(parsed.metadata.timestamp, response.metadata.timestamp);
    }

    #[test]
    fn exported_filter_shape() {
        let svc = service();
        let filter = svc.create_bloom_filter_for_record(&record(
            "rec-1",
            vec![SensitiveField::exact("email", "a@b.com")],
        ));

        let value = serde_json::to_value(svc.export_bloom_filter(&filter)).unwrap();
        assert_eq!(object_keys(&value), vec!["bits_hex", "hash_count", "size"]);
        assert_eq!(value["size"], json!(1000));

        let parsed: ExportedBloomFilter = serde_json::from_value(value).unwrap();
        let imported = svc.import_bloom_filter(&parsed).unwrap();
        assert_eq!(imported.to_hex(), filter.to_hex());
    }

    #[test]
    fn raw_values_never_appear_in_debug_output() {
        let field = SensitiveField::exact("ssn", "123-45-6789");
        let req = request(vec![field], 0.5);
        assert!(!format!("{:?}", req).contains("123-45-6789"));
    }
}
