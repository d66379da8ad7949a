use indoc::indoc;
use quickcheck::{QuickCheck, TestResult};

use wp_lang_tools::editor::Highlighter;
use wp_lang_tools::lexer::{
    tokenize, tokenize_from, Classifier, JsonClassifier, OmlClassifier, OmlState, Token, TokenCategory,
    WplClassifier,
};
use wp_lang_tools::EditorLanguage;

fn styled<'a>(source: &'a str, tokens: &[Token]) -> Vec<(&'a str, TokenCategory)> {
    tokens
        .iter()
        .filter(|t| t.category.is_styled())
        .map(|t| (t.text(source), t.category))
        .collect()
}

fn covers_exactly(source: &str, tokens: &[Token]) -> bool {
    let mut pos = 0;
    for token in tokens {
        if token.start != pos || token.end <= token.start || !source.is_char_boundary(token.end) {
            return false;
        }
        pos = token.end;
    }
    pos == source.len()
}

#[test]
fn test_wpl_package_document() {
    let source = indoc! {r#"
        # access log
        package /nginx/ {
          #[tag(source: "edge")]
          rule access {
            (ip:src_ip, 2*_, time/clf<[,]>:ts, http/request, digit:status)
            |decode/base64|
          }
        }
    "#};
    let tokens = tokenize(&WplClassifier::default(), source);
    assert!(covers_exactly(source, &tokens));

    let classes = styled(source, &tokens);
    assert_eq!(classes[0], ("# access log", TokenCategory::Comment));
    assert_eq!(classes[1], ("package", TokenCategory::Keyword));
    assert!(classes.contains(&("rule", TokenCategory::Keyword)));
    assert!(classes.contains(&("ip", TokenCategory::Type)));
    assert!(classes.contains(&("time/clf", TokenCategory::Type)));
    assert!(classes.contains(&("digit", TokenCategory::Type)));
    assert!(classes.contains(&("decode/base64", TokenCategory::Function)));
    assert!(classes.contains(&("2", TokenCategory::Number)));
    // `#` comments to end of line wherever it appears
    assert!(classes.contains(&("#[tag(source: \"edge\")]", TokenCategory::Comment)));
    assert!(!classes.iter().any(|(_, category)| *category == TokenCategory::String));
}

#[test]
fn test_oml_sections() {
    let source = indoc! {r#"
        name : nginx_access
        ---
        src : ip = read(src_ip) ;
        ts : time = Now::time() ;
        level = match read(status) {
          500 => "high" ;
          _ => "low" ;
        } ;
        ---
        src : privacy_ip
    "#};
    let (tokens, state) = tokenize_from(&OmlClassifier::default(), source, OmlState::default());
    assert!(covers_exactly(source, &tokens));
    assert!(state.in_header && state.in_privacy);

    let classes = styled(source, &tokens);
    assert!(classes.contains(&("---", TokenCategory::Keyword)));
    assert!(classes.contains(&("ip", TokenCategory::Type)));
    assert!(classes.contains(&("time", TokenCategory::Type)));
    assert!(classes.contains(&("read", TokenCategory::Function)));
    assert!(classes.contains(&("Now::time", TokenCategory::Function)));
    assert!(classes.contains(&("match", TokenCategory::Keyword)));
    assert!(classes.contains(&("500", TokenCategory::Number)));
    assert_eq!(classes.last(), Some(&("privacy_ip", TokenCategory::Type)));
}

#[test]
fn test_unterminated_string_is_one_token() {
    for (language, source) in [
        (EditorLanguage::Wpl, "\"abc"),
        (EditorLanguage::Oml, "\"abc"),
        (EditorLanguage::Json, "\"abc"),
    ] {
        let tokens = Highlighter::for_language(language).tokenize(source);
        assert_eq!(tokens, vec![Token::new(0, 4, TokenCategory::String)], "{:?}", language);
    }
}

#[test]
fn test_unterminated_string_stops_at_line_end() {
    let source = "\"abc\nrule";
    let tokens = tokenize(&WplClassifier::default(), source);
    assert_eq!(tokens[0], Token::new(0, 4, TokenCategory::String));
    assert_eq!(styled(source, &tokens).last(), Some(&("rule", TokenCategory::Keyword)));
}

#[test]
fn test_json_document() {
    let source = r#"{"ip": "10.0.0.1", "ok": true, "n": -1.5e3, "x": null}"#;
    let tokens = tokenize(&JsonClassifier, source);
    assert!(covers_exactly(source, &tokens));
    let classes = styled(source, &tokens);
    assert!(classes.contains(&("true", TokenCategory::Atom)));
    assert!(classes.contains(&("null", TokenCategory::Atom)));
    assert!(classes.contains(&("-1.5e3", TokenCategory::Number)));
}

fn state_from(bits: u8) -> OmlState {
    let in_header = bits & 1 != 0;
    OmlState {
        in_header,
        in_privacy: in_header && bits & 2 != 0,
        after_colon: bits & 4 != 0,
        after_equal: bits & 8 != 0,
    }
}

#[test]
fn test_oml_tokenization_is_total() {
    fn prop(source: String, bits: u8) -> TestResult {
        let (tokens, _) = tokenize_from(&OmlClassifier::default(), &source, state_from(bits));
        TestResult::from_bool(covers_exactly(&source, &tokens))
    }
    QuickCheck::new().tests(500).quickcheck(prop as fn(String, u8) -> TestResult);
}

#[test]
fn test_wpl_and_json_tokenization_is_total() {
    fn prop(source: String) -> TestResult {
        let wpl = tokenize(&WplClassifier::default(), &source);
        let json = tokenize(&JsonClassifier, &source);
        TestResult::from_bool(covers_exactly(&source, &wpl) && covers_exactly(&source, &json))
    }
    QuickCheck::new().tests(500).quickcheck(prop as fn(String) -> TestResult);
}

#[test]
fn test_tokenization_is_deterministic() {
    fn prop(source: String) -> bool {
        let classifier = OmlClassifier::default();
        tokenize(&classifier, &source) == tokenize(&classifier, &source)
            && tokenize(&WplClassifier::default(), &source) == tokenize(&WplClassifier::default(), &source)
    }
    QuickCheck::new().tests(200).quickcheck(prop as fn(String) -> bool);
}

#[test]
fn test_oml_privacy_implies_header() {
    fn prop(source: String) -> bool {
        let classifier = OmlClassifier::default();
        let mut state = classifier.start_state();
        let mut pos = 0;
        while pos < source.len() {
            let step = classifier.classify(&source[pos..], &state);
            state = step.state;
            if state.in_privacy && !state.in_header {
                return false;
            }
            pos += step.len.max(1);
            while !source.is_char_boundary(pos) {
                pos += 1;
            }
        }
        true
    }
    QuickCheck::new().tests(300).quickcheck(prop as fn(String) -> bool);
}
