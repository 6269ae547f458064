use serde_json::Value;
use std::fs;

fn emit_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => items.iter().for_each(|v| emit_strings(v, out)),
        Value::Object(map) => {
            for (k, v) in map {
                out.push(k);
                emit_strings(v, out);
            }
        }
        _ => {}
    }
}

#[test]
fn test_all_json_fixtures_are_tidy() {
    let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");
    let entries = fs::read_dir(data_dir).expect("Failed to read tests/data directory");

    let mut checked = 0;
    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            println!("Checking file: {:?}", path);
            let source =
                fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read file: {:?}", path));
            let doc: Value = serde_json::from_str(&source)
                .unwrap_or_else(|err| panic!("Failed to parse {:?}: {err}", path));

            let mut strings = Vec::new();
            emit_strings(&doc, &mut strings);
            for s in strings {
                assert_eq!(s, s.trim(), "{:?}: field needs whitespace stripped: {s:?}", path);
                assert!(
                    !s.chars().any(|c| c.is_whitespace() && c != ' '),
                    "{:?}: unexpected whitespace in {s:?}",
                    path
                );
            }
            checked += 1;
        }
    }
    assert!(checked >= 4);
}
