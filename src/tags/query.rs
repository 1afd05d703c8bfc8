/// KQL query construction for tag searches.
use super::request::{SearchMode, SearchRequest};

/// Build the Resource Graph query for a validated request.
///
/// Both templates project the same eight columns and sort by name ascending.
/// The search term is embedded as an escaped KQL string literal.
#[must_use]
pub fn build_query(request: &SearchRequest) -> String {
    let term = kql_string(request.term());
    match request.mode() {
        SearchMode::TagName => format!(
            "Resources\n\
             | where isnotnull(tags[{term}])\n\
             | project name, type, resourceGroup, location, subscriptionId, \
             tagKey = {term}, tagValue = tostring(tags[{term}]), id\n\
             | order by name asc"
        ),
        SearchMode::TagValue => format!(
            "Resources\n\
             | mv-expand tags\n\
             | extend tagKey = tostring(bag_keys(tags)[0])\n\
             | extend tagValue = tostring(tags[tagKey])\n\
             | where tagValue == {term}\n\
             | project name, type, resourceGroup, location, subscriptionId, tagKey, tagValue, id\n\
             | order by name asc"
        ),
    }
}

/// Quote `s` as a single-quoted KQL string literal.
#[must_use]
pub fn kql_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::request::SearchInput;

    fn by_name(name: &str) -> SearchRequest {
        SearchRequest::validate(&SearchInput {
            tag_name: Some(name),
            by_name: true,
            ..SearchInput::default()
        })
        .unwrap()
    }

    fn by_value(value: &str) -> SearchRequest {
        SearchRequest::validate(&SearchInput {
            tag_value: Some(value),
            by_value: true,
            ..SearchInput::default()
        })
        .unwrap()
    }

    #[test]
    fn name_query_uses_name_template_only() {
        let q = build_query(&by_name("Environment"));
        assert!(q.contains("tags['Environment']"));
        assert!(q.contains("tagKey = 'Environment'"));
        assert!(!q.contains("mv-expand"));
        assert!(!q.contains("bag_keys"));
        assert!(q.ends_with("| order by name asc"));
    }

    #[test]
    fn value_query_matches_value_exactly() {
        let q = build_query(&by_value("Production"));
        assert!(q.contains("mv-expand tags"));
        assert!(q.contains("where tagValue == 'Production'"));
        assert!(!q.contains("isnotnull"));
        assert!(q.ends_with("| order by name asc"));
    }

    #[test]
    fn both_templates_project_same_columns() {
        let columns = [
            "name",
            "type",
            "resourceGroup",
            "location",
            "subscriptionId",
            "tagKey",
            "tagValue",
            "id",
        ];
        for q in [build_query(&by_name("a")), build_query(&by_value("b"))] {
            let project = q.lines().find(|l| l.starts_with("| project")).unwrap();
            for col in columns {
                assert!(project.contains(col), "{col} missing from {project}");
            }
        }
    }

    #[test]
    fn query_is_deterministic() {
        assert_eq!(build_query(&by_value("x")), build_query(&by_value("x")));
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(kql_string("O'Brien"), r"'O\'Brien'");
        assert_eq!(kql_string(r"a\b"), r"'a\\b'");
        assert_eq!(kql_string("x\ny"), r"'x\ny'");

        let q = build_query(&by_value("x' or 1==1 //"));
        assert!(q.contains(r"where tagValue == 'x\' or 1==1 //'"));
    }
}
