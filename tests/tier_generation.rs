use std::path::PathBuf;

use dynamicfluency_rs::aeneas::aeneas_tier_from_json;
use dynamicfluency_rs::lexicon::{import_dictionary, IfExists, RowLookup, DEFAULT_KEY_COLUMN};
use dynamicfluency_rs::{
    load_textgrid, save_textgrid, AnyTier, FluencyConfig, FluencyError, FluencyPipelineBuilder,
    Interval, IntervalTier, SqliteLexicon, TaggedToken, Tagger, TextGridDocument,
};

const SYNC_MAP: &str = r#"{
    "fragments": [
        {"begin": "0.000", "end": "0.400", "lines": ["The"]},
        {"begin": "0.400", "end": "0.900", "lines": ["dog"]},
        {"begin": "0.900", "end": "1.300", "lines": ["isn't"]},
        {"begin": "1.300", "end": "1.300", "lines": ["barking"]},
        {"begin": "1.300", "end": "2.000", "lines": ["the"]},
        {"begin": "2.000", "end": "2.600", "lines": ["dog"]}
    ]
}"#;

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("dynamicfluency_rs_it_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn english_lexicon() -> std::collections::HashMap<String, String> {
    [("the", "DT"), ("dog", "NN"), ("is", "VBZ"), ("barking", "VBG")]
        .into_iter()
        .map(|(w, t)| (w.to_string(), t.to_string()))
        .collect()
}

fn labels(tier: &IntervalTier) -> Vec<&str> {
    tier.intervals.iter().map(|i| i.label.as_str()).collect()
}

#[test]
fn aeneas_to_pos_syntax_and_repetitions_grids() {
    let dir = temp_dir("full_chain");
    let words = aeneas_tier_from_json(SYNC_MAP, "Words", true).expect("sync map");
    let alignment_path = dir.join("speaker1.alignment.TextGrid");
    save_textgrid(
        &alignment_path,
        &TextGridDocument::from_interval_tiers(vec![words]),
    )
    .expect("save alignment grid");

    let lexicon_path = dir.join("lexicon.json");
    std::fs::write(
        &lexicon_path,
        serde_json::to_string(&english_lexicon()).expect("lexicon json"),
    )
    .expect("write lexicon");
    let config = FluencyConfig {
        lexicon_path: Some(lexicon_path.to_string_lossy().to_string()),
        ..FluencyConfig::default()
    };
    let pipeline = FluencyPipelineBuilder::new(config).build().expect("pipeline");

    let alignment = load_textgrid(&alignment_path).expect("load alignment grid");
    let pos = pipeline
        .pos_tier(alignment.interval_tier("Words").expect("words tier"))
        .expect("pos tier");
    assert_eq!(
        labels(&pos),
        ["the_DT", "dog_NN", "is_VBZ n't_RB", "barking_VBG", "the_DT", "dog_NN"]
    );
    for pair in pos.intervals.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }

    let pos_path = dir.join("speaker1.pos_tags.TextGrid");
    save_textgrid(&pos_path, &TextGridDocument::from_interval_tiers(vec![pos])).expect("save pos");
    let reloaded = load_textgrid(&pos_path).expect("reload pos grid");
    let pos = reloaded.interval_tier("POStags").expect("POStags tier");

    let (clauses, phrases) = pipeline.syntax_tiers(pos).expect("syntax");
    assert_eq!(clauses.points.len(), 2);
    assert!(phrases.points.is_empty());
    let mut syntax = TextGridDocument::new(reloaded.min_timestamp, reloaded.max_timestamp);
    syntax.push(AnyTier::Point(clauses));
    syntax.push(AnyTier::Point(phrases));
    save_textgrid(&dir.join("speaker1.syntax.TextGrid"), &syntax).expect("save syntax");

    let repetitions = pipeline.repetitions_tier(pos);
    assert_eq!(labels(&repetitions), ["0", "0", "0", "0", "0.25", "0.25"]);
    let freqdist = pipeline.freqdist_tier(pos);
    assert_eq!(freqdist.intervals[0].label, "0.3333333333333333");
    assert_eq!(freqdist.intervals[2].label, "0.16666666666666666");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn frequency_grid_from_imported_dictionary() {
    let dir = temp_dir("frequencies");
    let csv_path = dir.join("subtlex.tsv");
    std::fs::write(
        &csv_path,
        "WordForm\tFREQcount\tZipf\nthe\t1501908\t7.47\ndog\t19234\t5.07\nisn\t3\t1.2\nt\t400\t3.3\n",
    )
    .expect("write dictionary");
    let db_path = dir.join("main.db");
    import_dictionary(&csv_path, &db_path, "subtlex", b'\t', IfExists::Fail).expect("import");

    let lexicon = SqliteLexicon::open(&db_path, "subtlex", DEFAULT_KEY_COLUMN).expect("open");
    assert_eq!(lexicon.columns(), ["WordForm", "FREQcount", "Zipf"]);

    let config = FluencyConfig {
        to_ignore: vec!["uhm".to_string()],
        ..FluencyConfig::default()
    };
    let pipeline = FluencyPipelineBuilder::new(config)
        .with_tagger(Box::new(WhitespaceTagger))
        .with_frequency_lookup(Box::new(lexicon))
        .build()
        .expect("pipeline");

    let words = IntervalTier::new(
        "ORT-MAU",
        0.0,
        5.0,
        vec![
            Interval::new(0.0, 1.0, "The"),
            Interval::new(1.0, 2.0, "uhm"),
            Interval::new(2.0, 3.0, ""),
            Interval::new(3.0, 4.0, "isn't"),
            Interval::new(4.0, 5.0, "cat"),
        ],
    );
    let pos = pipeline.pos_tier(&words).expect("pos tier");
    let tiers = pipeline.frequency_tiers(&pos, None).expect("frequency tiers");
    assert_eq!(tiers.len(), 2);
    assert_eq!(labels(&tiers[0]), ["1501908", "", "", "3 400", "MISSING"]);
    assert_eq!(labels(&tiers[1]), ["7.47", "", "", "1.2 3.3", "MISSING"]);

    let out = dir.join("speaker1.frequencies.TextGrid");
    save_textgrid(&out, &TextGridDocument::from_interval_tiers(tiers)).expect("save");
    let reloaded = load_textgrid(&out).expect("reload");
    assert_eq!(reloaded.tiers.len(), 2);
    assert_eq!(reloaded.max_timestamp, 5.0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn mismatched_tagger_output_is_fatal() {
    let pipeline = FluencyPipelineBuilder::new(FluencyConfig::default())
        .with_tagger(Box::new(DroppingTagger))
        .build()
        .expect("pipeline");
    let words = IntervalTier::new(
        "Words",
        0.0,
        2.0,
        vec![Interval::new(0.0, 1.0, "a"), Interval::new(1.0, 2.0, "b")],
    );
    assert!(matches!(
        pipeline.pos_tier(&words),
        Err(FluencyError::AlignmentExhausted { index: 1, .. })
    ));
}

struct WhitespaceTagger;

impl Tagger for WhitespaceTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, FluencyError> {
        Ok(text
            .split_whitespace()
            .map(|word| TaggedToken::new(word, "NN"))
            .collect())
    }
}

/// Drops every token after the first.
struct DroppingTagger;

impl Tagger for DroppingTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, FluencyError> {
        Ok(text
            .split_whitespace()
            .take(1)
            .map(|word| TaggedToken::new(word, "NN"))
            .collect())
    }
}
