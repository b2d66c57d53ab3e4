use std::time::Instant;

use crate::model::{ElementId, LinkRef};
use crate::search::search;

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

#[test]
fn keystroke_recompute_p95_under_15ms() {
    let mut links: Vec<LinkRef> = (0..5_000)
        .map(|i| {
            LinkRef::new(
                ElementId(i),
                &format!("Article {i:05}"),
                &format!("https://example.com/articles/{i:05}"),
            )
        })
        .collect();

    links.push(LinkRef::new(
        ElementId(9_999),
        "Quarterly Report",
        "https://example.com/reports/q4",
    ));

    for _ in 0..30 {
        let _ = search(&links, "quarterly");
    }

    let mut batch_p95 = Vec::with_capacity(5);
    for _ in 0..5 {
        let mut samples = Vec::with_capacity(80);
        for _ in 0..80 {
            let start = Instant::now();
            let hits = search(&links, "quarterly");
            samples.push(start.elapsed().as_secs_f64() * 1000.0);
            assert_eq!(hits.len(), 1);
        }
        batch_p95.push(p95_ms(&mut samples));
    }

    batch_p95.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median_p95 = batch_p95[batch_p95.len() / 2];

    assert!(
        median_p95 <= 15.0,
        "median batch p95 too high: {median_p95:.3}ms (budget 15.0ms); batches={batch_p95:?}",
    );
}
