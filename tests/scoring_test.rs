//! Recruiter score rules, label thresholds, feature derivation and training labels.

use visitor_intent::config::LabelingConfig;
use visitor_intent::features::{Feature, VisitorBehavior, VisitorFeatures};
use visitor_intent::labeling::IntentLabeler;
use visitor_intent::model::IntentLabel;
use visitor_intent::scoring::{
    calculate_recruiter_score, has_recruiter_source, recruiter_label, score_behavior,
    RecruiterLabel, UnknownRecruiterLabel,
};

fn home() -> VisitorBehavior {
    VisitorBehavior::new("/")
}

#[test]
fn empty_behavior_scores_zero() {
    assert_eq!(calculate_recruiter_score(&home()), 0);
}

#[test]
fn each_rule_in_isolation() {
    let cases: Vec<(VisitorBehavior, i32)> = vec![
        (VisitorBehavior { source: Some("LinkedIn".into()), ..home() }, 5),
        (VisitorBehavior { source: Some("indeed-job-board".into()), ..home() }, 5),
        (VisitorBehavior { source: Some("Recruiter portal".into()), ..home() }, 5),
        (VisitorBehavior { source: Some("my-APPLICATION".into()), ..home() }, 5),
        (VisitorBehavior { source: Some("twitter".into()), ..home() }, 0),
        (VisitorBehavior::new("/Projects/compiler"), 3),
        (VisitorBehavior::new("/my-CV"), 3),
        (VisitorBehavior::new("/experience"), 3),
        (VisitorBehavior::new("/Resume.pdf"), 3),
        (VisitorBehavior { duration_seconds: Some(91.0), ..home() }, 2),
        (VisitorBehavior { duration_seconds: Some(90.0), ..home() }, 0),
        (VisitorBehavior { is_return_visitor: Some(true), ..home() }, 2),
        (VisitorBehavior { scrolled_to_bottom: Some(true), ..home() }, 1),
        (VisitorBehavior { downloaded_resume: Some(true), ..home() }, 10),
        (VisitorBehavior { pages_visited_count: Some(4), ..home() }, 15),
        (VisitorBehavior { pages_visited_count: Some(3), ..home() }, 0),
        (VisitorBehavior { is_rapid_bounce: Some(true), ..home() }, -3),
        (VisitorBehavior { is_return_visitor: Some(false), downloaded_resume: Some(false), ..home() }, 0),
    ];
    for (behavior, expected) in cases {
        assert_eq!(calculate_recruiter_score(&behavior), expected, "{:?}", behavior);
    }
}

#[test]
fn rules_add_up() {
    let b = VisitorBehavior {
        downloaded_resume: Some(true),
        pages_visited_count: Some(4),
        ..home()
    };
    assert_eq!(calculate_recruiter_score(&b), 25);

    let everything = VisitorBehavior {
        source: Some("linkedin.com/jobs".into()),
        path: "/projects".into(),
        duration_seconds: Some(240.0),
        is_return_visitor: Some(true),
        scrolled_to_bottom: Some(true),
        downloaded_resume: Some(true),
        pages_visited_count: Some(7),
        is_rapid_bounce: Some(true),
        scroll_depth: None,
    };
    assert_eq!(calculate_recruiter_score(&everything), 38 - 3);

    let bounce = VisitorBehavior {
        source: Some("job fair".into()),
        is_rapid_bounce: Some(true),
        ..home()
    };
    assert_eq!(calculate_recruiter_score(&bounce), 2);
}

#[test]
fn label_thresholds() {
    assert_eq!(recruiter_label(21).as_str(), "High-Intent Recruiter");
    assert_eq!(recruiter_label(20).as_str(), "Likely Recruiter");
    assert_eq!(recruiter_label(13).as_str(), "Likely Recruiter");
    assert_eq!(recruiter_label(12).as_str(), "Curious Professional");
    assert_eq!(recruiter_label(6).as_str(), "Curious Professional");
    assert_eq!(recruiter_label(5).as_str(), "Casual Visitor");
    assert_eq!(recruiter_label(-3).as_str(), "Casual Visitor");
}

#[test]
fn score_behavior_pairs_score_and_label() {
    let b = VisitorBehavior {
        source: Some("LinkedIn".into()),
        downloaded_resume: Some(true),
        is_return_visitor: Some(true),
        ..VisitorBehavior::new("/resume")
    };
    let scored = score_behavior(&b);
    assert_eq!(scored.score, 20);
    assert_eq!(scored.label, RecruiterLabel::LikelyRecruiter);
}

#[test]
fn recruiter_labels_parse_and_display() {
    for l in RecruiterLabel::ALL {
        assert_eq!(l.to_string().parse::<RecruiterLabel>(), Ok(l));
    }
    let err = "Recruiter".parse::<RecruiterLabel>().unwrap_err();
    assert_eq!(err, UnknownRecruiterLabel("Recruiter".to_string()));
    assert_eq!(err.to_string(), "unknown recruiter label: Recruiter");
}

#[test]
fn behavior_deserializes_from_camel_case() {
    let b: VisitorBehavior = serde_json::from_str(
        r#"{"source":"linkedin","path":"/cv","durationSeconds":120.5,"pagesVisitedCount":5,"isRapidBounce":false}"#,
    )
    .unwrap();
    assert_eq!(b.duration_seconds, Some(120.5));
    assert_eq!(b.pages_visited_count, Some(5));
    assert_eq!(b.downloaded_resume, None);
    assert_eq!(calculate_recruiter_score(&b), 5 + 3 + 2 + 15);
}

#[test]
fn features_from_sparse_behavior() {
    let f = VisitorFeatures::from_behavior(&home(), -3);
    assert_eq!(f.time_on_page, 0.0);
    assert_eq!(f.pages_visited, 1);
    assert!(!f.has_recruiter_source);
    assert_eq!(f.scroll_depth, 0.0);
    assert!(!f.is_return_visitor);
    assert_eq!(f.recruiter_score, -3);
}

#[test]
fn features_from_full_behavior() {
    let b = VisitorBehavior {
        source: Some("Recruiter InMail".into()),
        duration_seconds: Some(132.0),
        is_return_visitor: Some(true),
        scrolled_to_bottom: Some(true),
        pages_visited_count: Some(6),
        ..VisitorBehavior::new("/projects")
    };
    let score = calculate_recruiter_score(&b);
    let f = VisitorFeatures::from_behavior(&b, score);
    assert!(f.has_recruiter_source);
    assert_eq!(f.scroll_depth, 100.0);
    assert_eq!(f.pages_visited, 6);
    assert_eq!(f.value(Feature::IsReturnVisitor), 1.0);
    assert_eq!(f.value(Feature::RecruiterScore), f64::from(score));
    assert_eq!(f.to_vector(), [132.0, 6.0, 1.0, 100.0, 1.0, f64::from(score)]);

    let measured = VisitorBehavior {
        scroll_depth: Some(63.5),
        ..b
    };
    assert_eq!(VisitorFeatures::from_behavior(&measured, score).scroll_depth, 63.5);
}

#[test]
fn recruiter_source_matching() {
    assert!(has_recruiter_source(Some("https://www.LINKEDIN.com/")));
    assert!(!has_recruiter_source(Some("github")));
    assert!(!has_recruiter_source(None));
}

#[test]
fn training_labels_from_score() {
    let labeler = IntentLabeler::new(LabelingConfig::default());
    assert_eq!(labeler.label(25), IntentLabel::JobRecruiter);
    assert_eq!(labeler.label(15), IntentLabel::JobRecruiter);
    assert_eq!(labeler.label(14), IntentLabel::TechProfessional);
    assert_eq!(labeler.label(6), IntentLabel::TechProfessional);
    assert_eq!(labeler.label(5), IntentLabel::GeneralVisitor);
    assert_eq!(labeler.label(3), IntentLabel::GeneralVisitor);
    assert_eq!(labeler.label(2), IntentLabel::CasualViewer);
    assert_eq!(labeler.label(-3), IntentLabel::CasualViewer);
}
