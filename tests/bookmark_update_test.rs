#[cfg(test)]
mod tests {
    use anyhow::Result;
    use bookmark_time_updater::bookmarks::{
        check_ready, extract_urls, read_document, update_document, write_document, HuntConfig,
        RewriteOptions, SlotMatching, SlotOutcome, TimeRange, OUTPUT_PREFIX,
    };
    use bookmark_time_updater::{TimeZoneRule, UpdateError, UrlDialect};
    use chrono::NaiveDate;

    const EXPORT: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<META HTTP-EQUIV="Content-Type" CONTENT="text/html; charset=UTF-8">
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
    <DT>Hunt3 Summary <A HREF="https://arkime.example/sessions?startTime=1000&stopTime=2000">Session</A>
    <DT>Hunt5 Kibana <A HREF="https://kibana.example/app/discover#?_g=(time:(from:'2023-05-01T00:00:00.000Z',to:'2023-05-02T00:00:00.000Z'))">Discover</A>
    <DT>Test1 Dashboard <A HREF="https://kibana.example/app/discover#?_g=(time:(from:'2023-01-01T00:00:00.000Z',to:'2023-01-02T00:00:00.000Z'))">Dashboard</A>
    <DT>Test2 Runbook <A HREF="https://wiki.example/runbook">Runbook</A>
</DL><p>
"#;

    fn utc() -> RewriteOptions {
        RewriteOptions {
            zone: TimeZoneRule::Utc,
            slot_matching: SlotMatching::Prefix,
        }
    }

    #[test]
    fn test_arkime_scenario() -> Result<()> {
        let mut hunts = HuntConfig::default_hunts();
        hunts.set_range("Hunt3", TimeRange::new("2024-01-01T00:00", "2024-01-02T00:00"));

        let report = update_document(EXPORT, &hunts, &HuntConfig::default_tests(), &utc())?;

        assert!(report
            .content
            .contains("https://arkime.example/sessions?startTime=1704067200&stopTime=1704153600"));
        // Other slots' links are untouched
        assert!(report.content.contains("from:'2023-05-01T00:00:00.000Z'"));
        assert!(report.content.contains("from:'2023-01-01T00:00:00.000Z'"));
        Ok(())
    }

    #[test]
    fn test_kibana_scenario() -> Result<()> {
        let mut tests = HuntConfig::default_tests();
        tests.set_range("Test1", TimeRange::new("2024-06-10T12:00", "2024-06-10T18:30"));

        let report = update_document(EXPORT, &HuntConfig::default_hunts(), &tests, &utc())?;

        assert!(report.content.contains(
            "(time:(from:'2024-06-10T12:00:00.000Z',to:'2024-06-10T18:30:00.000Z'))\">Dashboard</A>"
        ));
        assert_eq!(
            report.slot("Test1").map(|s| s.outcome),
            Some(SlotOutcome::Matched { rewritten: 1, unknown: 0 })
        );
        Ok(())
    }

    #[test]
    fn test_start_only_slot_leaves_document_unchanged() -> Result<()> {
        let mut hunts = HuntConfig::default_hunts();
        hunts.set_start("Hunt3", "2024-01-01T00:00");

        let report = update_document(EXPORT, &hunts, &HuntConfig::default_tests(), &utc())?;
        assert_eq!(report.content, EXPORT);
        assert_eq!(report.configured_slots(), 0);
        Ok(())
    }

    #[test]
    fn test_extract_counts_known_links_only() {
        let urls = extract_urls(EXPORT);
        assert_eq!(urls.len(), 3);
        assert_eq!(urls.iter().filter(|u| u.dialect == UrlDialect::Arkime).count(), 1);
        assert_eq!(urls.iter().filter(|u| u.dialect == UrlDialect::Kibana).count(), 2);
        assert!(urls.iter().all(|u| u.title != "Runbook"));
    }

    #[test]
    fn test_malformed_time_fails_without_output() {
        let mut hunts = HuntConfig::default_hunts();
        hunts.set_range("Hunt3", TimeRange::new("2024-01-01T00:00", "tomorrow"));

        let result = update_document(EXPORT, &hunts, &HuntConfig::default_tests(), &utc());
        match result {
            Err(UpdateError::DateParse { slot, source }) => {
                assert_eq!(slot, "Hunt3");
                assert_eq!(source.input(), "tomorrow");
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(report) => panic!("update should fail, got: {}", report.summary()),
        }
    }

    #[test]
    fn test_no_slots_is_identity() -> Result<()> {
        let report = update_document(
            EXPORT,
            &HuntConfig::new(bookmark_time_updater::bookmarks::SlotLabel::Hunt),
            &HuntConfig::new(bookmark_time_updater::bookmarks::SlotLabel::Test),
            &RewriteOptions::default(),
        )?;
        assert_eq!(report.content, EXPORT);
        Ok(())
    }

    #[test]
    fn test_rewrite_then_extract() -> Result<()> {
        let mut hunts = HuntConfig::default_hunts();
        hunts.set_range("Hunt3", TimeRange::new("2024-01-01T00:00", "2024-01-02T00:00"));
        hunts.set_range("Hunt5", TimeRange::new("2024-02-01T06:00", "2024-02-01T07:00"));
        let mut tests = HuntConfig::default_tests();
        tests.set_range("Test2", TimeRange::new("2024-01-01T00:00", "2024-01-02T00:00"));

        let report = update_document(EXPORT, &hunts, &tests, &utc())?;
        assert_eq!(report.configured_slots(), 3);
        assert_eq!(report.applied_slots(), 2);
        assert_eq!(report.rewritten_urls(), 2);
        assert_eq!(report.unknown_urls(), 1);
        assert_eq!(
            report.summary(),
            "2 of 3 configured slots were applied (2 URLs rewritten, 1 left unchanged)"
        );

        let urls = extract_urls(&report.content);
        assert!(urls[0].url.contains("startTime=1704067200&stopTime=1704153600"));
        assert!(urls[1].url.contains("from:'2024-02-01T06:00:00.000Z',to:'2024-02-01T07:00:00.000Z'"));
        Ok(())
    }

    #[test]
    fn test_file_round_trip() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("bookmark_it_{}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        let input = dir.join("export.html");
        std::fs::write(&input, EXPORT)?;

        let content = read_document(&input)?;
        let mut hunts = HuntConfig::default_hunts();
        let tests = HuntConfig::default_tests();
        assert!(check_ready(&content, &hunts, &tests).unwrap_err().is_nothing_to_update());

        hunts.set_range("Hunt3", TimeRange::new("2024-01-01T00:00", "2024-01-02T00:00"));
        check_ready(&content, &hunts, &tests)?;
        let report = update_document(&content, &hunts, &tests, &utc())?;

        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let output = write_document(&dir, OUTPUT_PREFIX, &report.content, date)?;
        assert!(output.ends_with("bookmarks_updated_2024-01-02.html"));
        assert!(read_document(&output)?.contains("startTime=1704067200"));

        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
