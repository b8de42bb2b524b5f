use crate::approx::{EditKinds, Matcher, Strand, StrandMatch, DNA_ALPHABET};
use crate::cfg::Cfg;
use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::parser;
use crate::pda::Pda;
use crate::regex::Regex;
use ::regex::Regex as LibRegex;
use proptest::prelude::*;

#[test]
fn regex_pipeline_agreement() {
    let regex = Regex::parse("a(b|c)*d").unwrap();
    let nfa = regex.to_nfa().unwrap();
    let dfa = nfa.to_dfa().unwrap();
    let mut minimized = dfa.clone();
    minimized.minimize();

    for input in [&b"abcbd"[..], b"ad", b"abd", b"acbccbd", b"abc", b"d", b""] {
        let expected = nfa.accepts(input);
        assert_eq!(dfa.accepts(input), expected, "{input:?}");
        assert_eq!(minimized.accepts(input), expected, "{input:?}");
    }
    assert!(minimized.accepts(b"abcbd"));
    assert!(minimized.states().len() <= 3);
    assert!(minimized.states().len() <= dfa.states().len());
}

#[test]
fn exact_scan_finds_all_codons() {
    let dfa = Regex::compile("ATG").unwrap();
    let text = b"ATGCGATCGATCGATGCTAGCTAGATGCGATCGTAGCTAATGCGATCG";
    assert_eq!(dfa.find_all(text), vec![(0, 3), (13, 16), (24, 27), (39, 42)]);
}

#[test]
fn approximate_scan_with_one_edit() {
    let matcher = Matcher::new(b"ATG", 1, EditKinds::all());
    let matches = matcher.find(b"ATCCGATAGG");
    assert!(matches.iter().any(|m| (m.start, m.end, m.distance) == (0, 3, 1)));
    assert!(matches.iter().any(|m| (m.start, m.end, m.distance) == (5, 9, 1)));
    assert!(matches.iter().all(|m| m.distance <= 1));
}

#[test]
fn acceptance_modes_coincide_on_balanced_parens() {
    // the pre-built machine ε-pops the bottom marker into its final state,
    // so both acceptance criteria answer the same
    let pda = Pda::balanced_parens();
    for input in [&b""[..], b"(())", b"()()", b"(()", b"())", b")(", b"((((("] {
        assert_eq!(pda.accepts_final(input), pda.accepts_empty(input), "{input:?}");
    }
    assert!(pda.accepts_final(b"(())"));
    assert!(!pda.accepts_final(b"(()"));
}

#[test]
fn cfg_pda_agrees_with_hand_coded_machine() {
    let cfg: Cfg = parser::grammar("S -> a S b | ε").unwrap().try_into().unwrap();
    let pda = cfg.to_pda();
    let reference = Pda::a_n_b_n();

    assert!(pda.accepts_empty(b"aaabbb"));
    assert!(pda.accepts_final(b"aaabbb"));
    for input in [
        &b""[..], b"ab", b"aabb", b"aaabbb", b"a", b"b", b"ba", b"aab", b"abb", b"abab",
    ] {
        assert_eq!(pda.accepts_empty(input), reference.accepts_empty(input), "{input:?}");
        assert_eq!(pda.accepts_final(input), reference.accepts_final(input), "{input:?}");
    }
}

#[test]
fn palindrome_scenarios() {
    let pda = Pda::even_palindrome();
    assert!(pda.accepts_final(b"abba"));
    assert!(!pda.accepts_final(b"abab"));
}

#[test]
fn counted_quantifier_bounds() {
    let dfa = Regex::compile("a{2,3}").unwrap();
    assert!(!dfa.accepts(b"a"));
    assert!(dfa.accepts(b"aa"));
    assert!(dfa.accepts(b"aaa"));
    assert!(!dfa.accepts(b"aaaa"));
}

#[test]
fn matcher_at_k0_agrees_with_exact_scan() {
    let matcher = Matcher::new(b"GATTACA", 0, EditKinds::all());
    let dfa = Regex::compile("GATTACA").unwrap();
    let text = b"GATTACAGATTACAGGGATTACAT";
    let approximate: Vec<(usize, usize)> =
        matcher.find(text).iter().map(|m| (m.start, m.end)).collect();
    assert_eq!(approximate, dfa.find_all(text));
    assert!(matcher.find(text).iter().all(|m| m.distance == 0));
}

#[test]
fn both_strands_are_tagged_and_mapped() {
    // CAT at offset 3 is ATG read on the reverse strand
    let matcher = Matcher::new(b"ATG", 0, EditKinds::all());
    let matches = matcher.find_both_strands(b"ATGCAT");
    assert!(matches.contains(&StrandMatch {
        start: 0,
        end: 3,
        distance: 0,
        strand: Strand::Forward,
    }));
    assert!(matches.contains(&StrandMatch {
        start: 3,
        end: 6,
        distance: 0,
        strand: Strand::Reverse,
    }));
}

fn edit_distance(a: &[u8], b: &[u8]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut row = vec![i + 1];
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            row.push((prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1));
        }
        prev = row;
    }
    prev[b.len()]
}

fn random_regex() -> impl Strategy<Value = String> {
    "[ab]".prop_recursive(5, 32, 8, |inner| {
        prop_oneof![
            8 => prop::collection::vec(inner.clone(), 1..5)
                .prop_map(|parts| format!("({})", parts.join(""))),
            8 => prop::collection::vec(inner.clone(), 1..5).prop_map(|parts| parts.join("|")),
            2 => inner.clone().prop_map(|r| format!("({r})*")),
            2 => inner.clone().prop_map(|r| format!("({r})+")),
            2 => inner.clone().prop_map(|r| format!("({r})?")),
        ]
    })
}

proptest! {
    /// Compiled DFAs agree with the `regex` crate on whole-string matching
    #[test]
    fn random_regex_matches_oracle(
        pattern in random_regex(),
        inputs in prop::collection::vec("[ab]{0,12}", 16),
    ) {
        let dfa = Regex::compile(&pattern).unwrap();
        let oracle = LibRegex::new(&format!("^(?:{pattern})$")).unwrap();
        for input in &inputs {
            prop_assert_eq!(dfa.accepts_str(input), oracle.is_match(input), "{} on {:?}", pattern, input);
        }
    }

    /// NFA, DFA and minimized DFA accept the same language; minimization
    /// never grows the automaton and is idempotent
    #[test]
    fn random_regex_pipeline_consistency(
        pattern in random_regex(),
        inputs in prop::collection::vec("[ab]{0,10}", 8),
    ) {
        let regex = Regex::parse(&pattern).unwrap();
        let nfa = regex.to_nfa().unwrap();
        let dfa = nfa.to_dfa().unwrap();
        let mut minimized = dfa.clone();
        minimized.minimize();

        prop_assert!(minimized.states().len() <= dfa.states().len());
        prop_assert!(minimized.equivalent_to(&dfa));
        for input in &inputs {
            prop_assert_eq!(nfa.accepts_str(input), minimized.accepts_str(input));
        }

        let mut twice = minimized.clone();
        twice.minimize();
        prop_assert_eq!(twice, minimized);
    }

    /// DFA → NFA → DFA preserves the language
    #[test]
    fn dfa_nfa_round_trip(pattern in random_regex()) {
        let dfa = Regex::compile(&pattern).unwrap();
        let back = dfa.clone().to_nfa().to_dfa().unwrap();
        prop_assert!(back.equivalent_to(&dfa));
    }

    /// The Levenshtein automaton accepts exactly the strings within the
    /// edit-distance bound, before and after determinization
    #[test]
    fn levenshtein_accepts_iff_within_distance(
        pattern in "[ACGT]{1,5}",
        text in "[ACGT]{0,7}",
        k in 0u8..3,
    ) {
        let matcher = Matcher::new(pattern.as_bytes(), k, EditKinds::all());
        let nfa = matcher.to_nfa(&DNA_ALPHABET);
        let within = edit_distance(pattern.as_bytes(), text.as_bytes()) <= usize::from(k);
        prop_assert_eq!(nfa.accepts(text.as_bytes()), within);
        let dfa = nfa.to_dfa().unwrap();
        prop_assert_eq!(dfa.accepts(text.as_bytes()), within);
    }

    /// JSON round trips: exact equality for DFAs, language preservation
    /// for NFAs
    #[test]
    fn json_round_trip_preserves_language(
        pattern in random_regex(),
        inputs in prop::collection::vec("[ab]{0,8}", 8),
    ) {
        let dfa = Regex::compile(&pattern).unwrap();
        let restored = Dfa::from_json(&dfa.to_json()).unwrap();
        prop_assert_eq!(&restored, &dfa);

        let nfa = Regex::parse(&pattern).unwrap().to_nfa().unwrap();
        let restored = Nfa::from_json(&nfa.to_json()).unwrap();
        for input in &inputs {
            prop_assert_eq!(restored.accepts_str(input), nfa.accepts_str(input));
        }
    }
}
