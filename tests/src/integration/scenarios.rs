//! # End-to-End Linkage Scenarios
//!
//! Drives `PprlService` through the `PprlApi` port the way the orchestration
//! layer does: validate, then match against a provider's candidates.
//!
//! ## Test Categories
//!
//! 1. **Exact agreement**: identical fields link
//! 2. **Disagreement**: disjoint fields never link
//! 3. **Normalization**: fuzzy and phonetic variants link
//! 4. **Scan behavior**: ordering, parallel scans, deadlines
//! 5. **Filter transport**: export/import golden values

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pprl_engine::{
        BloomFilter, PprlApi, PprlConfig, PprlError, PprlService, SensitiveField, ValidationError,
    };

    use crate::fixtures::{
        init_tracing, person_fields, random_candidates, record, request, test_config,
    };

    fn service() -> PprlService {
        init_tracing();
        PprlService::new(test_config()).unwrap()
    }

    // =========================================================================
    // EXACT AGREEMENT
    // =========================================================================

    #[test]
    fn scenario_a_identical_exact_fields_link() {
        let svc = service();
        let req = request(vec![SensitiveField::exact("email", "a@b.com")], 0.5);
        let candidates = vec![record("rec-a", vec![SensitiveField::exact("email", "a@b.com")])];

        svc.validate_pprl_request(&req).unwrap();
        let response = svc.perform_pprl(&req, &candidates);

        assert!(response.match_found);
        assert!(response.confidence >= 0.5);
        assert_eq!(response.matched_fields, vec!["email".to_string()]);
    }

    #[test]
    fn full_person_links_to_its_own_record() {
        let svc = service();
        let fields = person_fields("jane@example.com", "Jane Doe", "Doe");
        let req = request(fields.clone(), 0.9);

        let mut candidates = random_candidates(20, 7);
        candidates.push(record("target", fields));

        let response = svc.perform_pprl(&req, &candidates);

        assert!(response.match_found);
        assert_eq!(response.confidence, 1.0);
        assert_eq!(response.metadata.matched_record_id.as_deref(), Some("target"));
        assert_eq!(
            response.matched_fields,
            vec![
                "email".to_string(),
                "full_name".to_string(),
                "surname".to_string()
            ]
        );
    }

    // =========================================================================
    // DISAGREEMENT
    // =========================================================================

    #[test]
    fn scenario_b_disjoint_fields_do_not_link() {
        let svc = service();
        let req = request(person_fields("a@b.com", "Alice Smith", "Smith"), 0.5);
        let candidates = vec![record(
            "rec-b",
            person_fields("z@y.org", "Bob Taylor", "Taylor"),
        )];

        let response = svc.perform_pprl(&req, &candidates);

        assert!(!response.match_found);
        assert_eq!(response.confidence, 0.0);
        assert!(response.matched_fields.is_empty());
    }

    #[test]
    fn shared_email_alone_is_below_a_strict_threshold() {
        let svc = service();
        let req = request(person_fields("a@b.com", "Alice Smith", "Smith"), 0.5);
        let candidates = vec![record(
            "rec-c",
            person_fields("a@b.com", "Bob Taylor", "Taylor"),
        )];

        assert!(!svc.perform_pprl(&req, &candidates).match_found);

        let lenient = request(person_fields("a@b.com", "Alice Smith", "Smith"), 0.1);
        let response = svc.perform_pprl(&lenient, &candidates);
        assert!(response.match_found);
        assert!(response.confidence < 0.5);
        assert_eq!(response.matched_fields, vec!["email".to_string()]);
    }

    #[test]
    fn different_salts_never_link() {
        init_tracing();
        let ours = PprlService::new(test_config()).unwrap();
        let theirs = PprlService::new(PprlConfig {
            salt: "another-salt".to_string(),
            ..test_config()
        })
        .unwrap();

        let field = SensitiveField::exact("email", "a@b.com");
        assert_ne!(ours.hash_sensitive_field(&field), theirs.hash_sensitive_field(&field));
    }

    // =========================================================================
    // NORMALIZATION
    // =========================================================================

    #[test]
    fn near_duplicate_names_link_through_normalization() {
        let svc = service();
        let req = request(person_fields("a@b.com", "Mrs Mary-Ann O'Neil", "Rupert"), 0.95);
        let candidates = vec![record(
            "rec-n",
            person_fields("  A@B.com", "mary ann oneil", "Robert"),
        )];

        let response = svc.perform_pprl(&req, &candidates);
        assert!(response.match_found);
        assert_eq!(response.confidence, 1.0);
    }

    // =========================================================================
    // SCAN BEHAVIOR
    // =========================================================================

    #[test]
    fn large_scan_uses_parallel_path_and_keeps_first_winner() {
        let svc = service();
        assert!(svc.config().parallel_threshold <= 200);

        let fields = person_fields("jane@example.com", "Jane Doe", "Doe");
        let req = request(fields.clone(), 0.9);

        let mut candidates = random_candidates(200, 42);
        candidates[150] = record("late", fields.clone());
        candidates[60] = record("early", fields);

        let response = svc.perform_pprl(&req, &candidates);

        assert_eq!(response.metadata.candidate_count, 200);
        assert_eq!(response.metadata.matched_record_id.as_deref(), Some("early"));
    }

    #[test]
    fn repeated_scans_are_deterministic() {
        let svc = service();
        let req = request(person_fields("x@y.z", "Sam Lee", "Lee"), 0.05);
        let candidates = random_candidates(100, 3);

        let first = svc.perform_pprl(&req, &candidates);
        let second = svc.perform_pprl(&req, &candidates);

        assert_eq!(first.match_found, second.match_found);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.bloom_filter_hex, second.bloom_filter_hex);
        assert_eq!(
            first.metadata.matched_record_id,
            second.metadata.matched_record_id
        );
    }

    #[test]
    fn expired_deadline_is_reported_not_treated_as_no_match() {
        let svc = service();
        let req = request(vec![SensitiveField::exact("email", "a@b.com")], 0.5);
        let candidates = random_candidates(10, 1);

        match svc.perform_pprl_within(&req, &candidates, Duration::ZERO) {
            Err(PprlError::DeadlineExceeded { scanned, total }) => {
                assert_eq!(scanned, 0);
                assert_eq!(total, 10);
            }
            other => panic!("expected DeadlineExceeded, got {:?}", other),
        }
    }

    #[test]
    fn validation_is_separate_from_matching() {
        let svc = service();
        let req = request(vec![SensitiveField::exact("email", "a@b.com")], 1.5);

        assert_eq!(
            svc.validate_pprl_request(&req),
            Err(ValidationError::ThresholdOutOfRange { threshold: 1.5 })
        );
        // Matching still runs; nothing qualifies above 1.0.
        let candidates = vec![record("r", vec![SensitiveField::exact("email", "a@b.com")])];
        assert!(!svc.perform_pprl(&req, &candidates).match_found);
    }

    // =========================================================================
    // FILTER TRANSPORT
    // =========================================================================

    #[test]
    fn scenario_c_export_import_golden() {
        let svc = service();
        let mut filter = BloomFilter::new(100, 3);
        filter.insert("test-value-1");
        filter.insert("test-value-2");

        let exported = svc.export_bloom_filter(&filter);
        assert_eq!(exported.bits_hex, "20040001000000020001000008");

        let imported = svc.import_bloom_filter(&exported).unwrap();
        assert!(imported.contains("test-value-1"));
        assert!(imported.contains("test-value-2"));
        assert!(!imported.contains("test-value-3"));
    }

    #[test]
    fn imported_query_filter_scores_like_the_original() {
        let svc = service();
        let fields = person_fields("jane@example.com", "Jane Doe", "Doe");
        let target = record("target", fields.clone());
        let response = svc.perform_pprl(&request(fields, 0.5), std::slice::from_ref(&target));

        let exported = pprl_engine::ExportedBloomFilter {
            size: svc.config().filter_size,
            hash_count: svc.config().hash_count,
            bits_hex: response.bloom_filter_hex.clone(),
        };
        let query = svc.import_bloom_filter(&exported).unwrap();
        let candidate = svc.create_bloom_filter_for_record(&target);

        assert_eq!(query.jaccard_similarity(&candidate), response.confidence);
    }
}
