use super::types::{ReportEntry, TestRunReport};
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

/// Generate JUnit XML, one testcase per scenario
pub fn generate_junit_xml(report: &TestRunReport<'_>) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = report.summary.total.to_string();
    let failures = report.summary.failed.to_string();
    let total_secs: f64 = report
        .results
        .iter()
        .map(|e| e.result.duration.as_secs_f64())
        .sum();
    let total_time = format!("{:.3}", total_secs);

    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "bible-api-tester-run"));
    suites_start.push_attribute(("tests", total_tests.as_str()));
    suites_start.push_attribute(("failures", failures.as_str()));
    suites_start.push_attribute(("time", total_time.as_str()));
    writer.write_event(Event::Start(suites_start))?;

    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", report.base_url));
    suite_start.push_attribute(("tests", total_tests.as_str()));
    suite_start.push_attribute(("failures", failures.as_str()));
    suite_start.push_attribute(("skipped", "0"));
    suite_start.push_attribute(("id", report.session_id.as_str()));
    suite_start.push_attribute(("time", total_time.as_str()));
    suite_start.push_attribute(("timestamp", report.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for entry in &report.results {
        write_test_case(&mut writer, entry)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let xml = String::from_utf8(writer.into_inner().into_inner())?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    entry: &ReportEntry<'_>,
) -> Result<()> {
    let result = entry.result;
    let classname = classname_for(&result.url);
    let time = format!("{:.3}", result.duration.as_secs_f64());

    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", result.name.as_str()));
    case_start.push_attribute(("classname", classname.as_str()));
    case_start.push_attribute(("time", time.as_str()));
    writer.write_event(Event::Start(case_start))?;

    if !entry.success {
        let message = match (result.error(), result.status()) {
            (Some(error), _) => error.to_string(),
            (None, Some(status)) => format!("HTTP {}", status),
            (None, None) => "Unknown error".to_string(),
        };
        let kind = if result.error().is_some() {
            "TransportError"
        } else {
            "StatusError"
        };

        let mut fail_start = BytesStart::new("failure");
        fail_start.push_attribute(("message", message.as_str()));
        fail_start.push_attribute(("type", kind));
        writer.write_event(Event::Start(fail_start))?;
        writer.write_event(Event::Text(BytesText::new(&format!(
            "{} {}: {}",
            result.method, result.url, message
        ))))?;
        writer.write_event(Event::End(BytesEnd::new("failure")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// `/api/users/me?page=1` -> `api.users.me`
fn classname_for(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    let joined = path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(".");
    if joined.is_empty() {
        "root".to_string()
    } else {
        joined
    }
}

/// Write the JUnit report to `path`
pub fn write_report(report: &TestRunReport<'_>, path: &Path) -> Result<()> {
    let xml = generate_junit_xml(report)?;
    std::fs::write(path, xml)?;
    Ok(())
}
