//! Text renderings of a resolved configuration

use serde_json::{Map, Value};

/// Compact single-line JSON.
pub fn render_json(values: &Map<String, Value>) -> Result<String, serde_json::Error> {
    serde_json::to_string(values)
}

pub fn render_json_pretty(values: &Map<String, Value>) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(values)
}

pub fn render_yaml(values: &Map<String, Value>) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Map<String, Value> {
        let Value::Object(map) = json!({
            "name": "foo",
            "port": 8080,
            "tuning": {"rate": 2.5}
        }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn test_render_json() {
        insta::assert_snapshot!(
            render_json(&sample()).expect("json"),
            @r###"{"name":"foo","port":8080,"tuning":{"rate":2.5}}"###
        );
    }

    #[test]
    fn test_render_json_pretty() {
        insta::assert_snapshot!(render_json_pretty(&sample()).expect("json"), @r###"
        {
          "name": "foo",
          "port": 8080,
          "tuning": {
            "rate": 2.5
          }
        }
        "###);
    }

    #[test]
    fn test_render_yaml() {
        insta::assert_snapshot!(render_yaml(&sample()).expect("yaml").trim_end(), @r###"
        name: foo
        port: 8080
        tuning:
          rate: 2.5
        "###);
    }

    #[test]
    fn test_renderings_parse_back_to_same_values() {
        let json: Value = serde_json::from_str(&render_json(&sample()).expect("json")).expect("parse");
        let yaml: Value = serde_yaml::from_str(&render_yaml(&sample()).expect("yaml")).expect("parse");
        assert_eq!(json, yaml);
        assert_eq!(json, Value::Object(sample()));
    }
}
