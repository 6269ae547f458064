use citation_patterns::{Database, Sources};

fn main() {
    let variables = r#"{
        "volume": "(?P<volume>\\d+)",
        "page": "(?P<page>\\d+)",
        "full_cite": "$volume (?P<reporter>$edition) $page"
    }"#;
    let reporters = r#"{
        "A.": [{
            "name": "Atlantic Reporter",
            "editions": {
                "A.": { "start": "1885-01-01T00:00:00", "end": "1938-12-31T00:00:00", "regexes": ["$full_cite"] },
                "A.2d": { "start": "1938-01-01T00:00:00", "end": "2010-12-31T00:00:00", "regexes": ["$full_cite"] }
            },
            "variations": { "A. 2d": "A.2d", "Atl.": "A." }
        }]
    }"#;

    let db = match Database::build(Sources {
        variables,
        reporters,
        ..Sources::default()
    }) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to build citation database: {:?}", miette::Report::new(e));
            return;
        }
    };

    for citation in ["12 A. 345", "12 Atl. 345", "99 A. 2d 7"] {
        for pattern in db.patterns() {
            let Ok(matcher) = pattern.compile() else {
                continue;
            };
            if let Some(groups) = matcher.captures(citation) {
                let edition = pattern.edition.as_deref().unwrap_or_default();
                println!("{citation} -> {edition} {groups:?}");
            }
        }
    }

    match db.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize: {e}"),
    }
}
