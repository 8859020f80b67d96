//! Pipeline benchmark: behavior → recruiter score → features → intent.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use visitor_intent::features::{VisitorBehavior, VisitorFeatures};
use visitor_intent::ingest::VisitRecord;
use visitor_intent::labeling::IntentLabeler;
use visitor_intent::model::IntentClassifier;
use visitor_intent::scoring::calculate_recruiter_score;
use visitor_intent::config::LabelingConfig;

fn make_behaviors(n: usize) -> Vec<VisitorBehavior> {
    (0..n)
        .map(|i| VisitorBehavior {
            source: Some(if i % 3 == 0 { "linkedin" } else { "github" }.to_string()),
            duration_seconds: Some((i % 200) as f64),
            is_return_visitor: Some(i % 4 == 0),
            scrolled_to_bottom: Some(i % 2 == 0),
            downloaded_resume: Some(i % 9 == 0),
            pages_visited_count: Some((i % 6) as u32 + 1),
            is_rapid_bounce: Some(i % 11 == 0),
            ..VisitorBehavior::new(if i % 2 == 0 { "/projects" } else { "/blog" })
        })
        .collect()
}

fn bench_scoring(c: &mut Criterion) {
    let behaviors = make_behaviors(100);
    c.bench_function("score_100_behaviors", |b| {
        b.iter(|| {
            black_box(&behaviors)
                .iter()
                .map(calculate_recruiter_score)
                .sum::<i32>()
        })
    });
}

fn bench_features(c: &mut Criterion) {
    let behaviors = make_behaviors(100);
    c.bench_function("derive_features_100", |b| {
        b.iter(|| {
            black_box(&behaviors)
                .iter()
                .map(|bh| VisitorFeatures::from_behavior(bh, calculate_recruiter_score(bh)))
                .collect::<Vec<_>>()
        })
    });
}

fn bench_full_pipeline(c: &mut Criterion) {
    let labeler = IntentLabeler::new(LabelingConfig::default());
    let visits: Vec<VisitRecord> = make_behaviors(500).into_iter().map(VisitRecord::new).collect();

    c.bench_function("retrain_and_predict_500", |b| {
        b.iter(|| {
            let mut model = IntentClassifier::new();
            for v in &visits {
                model.train(&v.features(), labeler.label(v.recruiter_score));
            }
            visits
                .iter()
                .map(|v| model.predict(&v.features()))
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(benches, bench_scoring, bench_features, bench_full_pipeline);
criterion_main!(benches);
