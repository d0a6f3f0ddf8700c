use std::collections::BTreeMap;

use proptest::prelude::*;

use adiflog::{
    config::LogConfig,
    document::{AdifLog, record::Record},
    parse::lexer::TagLexer,
    types::{LengthUnit, LexMode, Token},
};

fn tag_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,11}".prop_filter("reserved tag", |t| {
        let t = t.to_lowercase();
        t != "eor" && t != "eoh" && !t.contains("eof")
    })
}

fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,24}",
        "[<>:\n a-zäöü]{0,16}",
        Just(String::new()),
    ]
}

fn record_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(tag_strategy().prop_map(|t| t.to_lowercase()), value_strategy(), 1..8)
}

fn lex_all(input: &str, mode: LexMode, unit: LengthUnit) -> Vec<Token> {
    TagLexer::new(input.as_bytes(), mode, unit)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

proptest! {
    #[test]
    fn declared_length_yields_exact_value(tag in tag_strategy(), value in value_strategy()) {
        let chars = format!("<{}:{}>{}<eor>", tag, value.chars().count(), value);
        let bytes = format!("<{}:{}>{}<eor>", tag, value.len(), value);

        for (input, unit) in [(chars, LengthUnit::Chars), (bytes, LengthUnit::Bytes)] {
            let toks = lex_all(&input, LexMode::Strict, unit);
            prop_assert_eq!(toks.len(), 2);
            prop_assert_eq!(&toks[0], &Token::new(tag.clone(), value.clone()));
            prop_assert!(toks[1].is("eor"));
        }
    }

    #[test]
    fn tag_case_does_not_matter(
        tag in tag_strategy().prop_filter("derived field", |t| {
            !["frqint", "isodate"].contains(&t.to_lowercase().as_str())
        }),
        value in "[A-Z0-9]{1,10}",
    ) {
        let upper = format!("<{}:{}>{}<EOR>", tag.to_uppercase(), value.len(), value);
        let lower = format!("<{}:{}>{}<eor>", tag.to_lowercase(), value.len(), value);
        let a = AdifLog::parse_str(&upper, &LogConfig::default()).unwrap();
        let b = AdifLog::parse_str(&lower, &LogConfig::default()).unwrap();
        prop_assert_eq!(a.records(), b.records());
        prop_assert_eq!(a.records()[0].get(&tag).unwrap(), value.as_str());
    }

    #[test]
    fn reserialized_records_reparse_equal(records in prop::collection::vec(record_strategy(), 1..6)) {
        let originals: Vec<Record> = records.iter().map(|r| Record::from_fields(r.clone())).collect();
        let text = originals.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n\n");

        let log = AdifLog::parse_str(&text, &LogConfig::default()).unwrap();
        prop_assert_eq!(log.records(), originals.as_slice());
    }

    #[test]
    fn tolerant_lexer_recovers_around_garbage(
        garbage in "[a-zA-Z0-9 ,;!?\n]{1,20}",
        a in "[a-z]{1,8}",
        b in "[a-z]{1,8}",
    ) {
        let input = format!("<a:{}>{}{}<b:{}>{}", a.len(), a, garbage, b.len(), b);
        let toks = lex_all(&input, LexMode::Tolerant, LengthUnit::Chars);
        prop_assert_eq!(toks, vec![Token::new("a", a), Token::new("b", b)]);
    }
}
