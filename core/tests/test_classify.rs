use saltstats_core::{ColorScheme, Thresholds, Tier};

#[test]
fn lower_is_better() {
    let t = Thresholds::new(13.0, 18.0);
    assert!(t.lower_is_better());
    assert_eq!(t.classify(0.0), Tier::Good);
    assert_eq!(t.classify(12.999), Tier::Good);
    assert_eq!(t.classify(13.0), Tier::Mediocre);
    assert_eq!(t.classify(17.999), Tier::Mediocre);
    assert_eq!(t.classify(18.0), Tier::Bad);
    assert_eq!(t.classify(95.0), Tier::Bad);
}

#[test]
fn higher_is_better() {
    let t = Thresholds::new(47.0, 37.0);
    assert_eq!(t.classify(36.9), Tier::Bad);
    assert_eq!(t.classify(37.0), Tier::Mediocre);
    assert_eq!(t.classify(46.9), Tier::Mediocre);
    assert_eq!(t.classify(47.0), Tier::Good);
}

#[test]
fn tiers_have_distinct_colours() {
    let colours = [Tier::Good, Tier::Mediocre, Tier::Bad, Tier::Neutral].map(|t| t.css_color());
    for (i, a) in colours.iter().enumerate() {
        for b in &colours[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn scheme_json() {
    let scheme = ColorScheme::GoodMediocreBad(Thresholds::new(3.0, 6.0));
    let json = serde_json::to_value(scheme).unwrap();
    assert_eq!(json["kind"], "good_mediocre_bad");
    assert_eq!(json["good_limit"], 3.0);

    let neutral: ColorScheme = serde_json::from_str(r#"{ "kind": "neutral" }"#).unwrap();
    assert_eq!(neutral.classify(Some(50.0)), Tier::Neutral);
    assert_eq!(serde_json::to_string(&Tier::Mediocre).unwrap(), "\"mediocre\"");
}
