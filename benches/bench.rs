// Criterion benchmarks for Mentor Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mentor_match::core::{score_pair, tag_overlap, Ranker, ScoringWeights, TimezonePolicy};
use mentor_match::models::{MenteeProfile, MentorProfile, TagSet};

const SECTORS: [&str; 6] = ["FinTech", "HealthTech", "AI", "Retail", "Energy", "EdTech"];
const SKILLS: [&str; 5] = ["Fundraising", "Hiring", "Sales", "Product", "Legal"];
const LANGUAGES: [&str; 3] = ["English", "Portuguese", "Spanish"];

fn create_mentor(id: usize) -> MentorProfile {
    MentorProfile {
        mentor_id: format!("M{:03}", id),
        name: format!("Mentor {}", id),
        email: format!("mentor{}@example.org", id),
        sectors: TagSet::parse(&format!("{},{}", SECTORS[id % 6], SECTORS[(id + 1) % 6])),
        expertise: TagSet::parse(SKILLS[id % 5]),
        functions: TagSet::parse(SKILLS[(id + 2) % 5]),
        languages: TagSet::parse(LANGUAGES[id % 3]),
        format: Some(if id % 2 == 0 { "Remote" } else { "Either" }.to_string()),
        timezone: Some(format!("UTC+{}", id % 3)),
        availability: if id % 4 == 0 { None } else { Some("Mon-Fri".to_string()) },
        ..Default::default()
    }
}

fn create_mentee(id: usize) -> MenteeProfile {
    MenteeProfile {
        mentee_id: format!("ME{:03}", id),
        name: format!("Mentee {}", id),
        email: format!("mentee{}@example.org", id),
        project_name: Some(format!("Project {}", id)),
        sector: TagSet::parse(SECTORS[id % 6]),
        needs: TagSet::parse(&format!("{},{}", SKILLS[id % 5], SKILLS[(id + 3) % 5])),
        languages: TagSet::parse(&format!("English,{}", LANGUAGES[id % 3])),
        format: Some("Remote".to_string()),
        timezone: Some(format!("UTC+{}", id % 2)),
        availability: Some("Tue".to_string()),
        ..Default::default()
    }
}

fn bench_tag_overlap(c: &mut Criterion) {
    let a = TagSet::parse("FinTech, HealthTech, AI, Retail");
    let b = TagSet::parse("ai, energy, fintech");

    c.bench_function("tag_overlap", |bench| {
        bench.iter(|| tag_overlap(black_box(&a), black_box(&b)));
    });
}

fn bench_score_pair(c: &mut Criterion) {
    let mentor = create_mentor(1);
    let mentee = create_mentee(1);
    let weights = ScoringWeights::default();

    c.bench_function("score_pair", |b| {
        b.iter(|| {
            score_pair(
                black_box(&mentor),
                black_box(&mentee),
                &weights,
                TimezonePolicy::ExactLabel,
            )
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");

    for pool_size in [10, 50, 100, 500].iter() {
        let mentors: Vec<MentorProfile> = (0..*pool_size).map(create_mentor).collect();
        let mentees: Vec<MenteeProfile> = (0..*pool_size).map(create_mentee).collect();

        for parallel in [false, true] {
            let ranker = Ranker::with_default_weights().with_parallel(parallel);
            let name = if parallel { "rank_matches_parallel" } else { "rank_matches" };

            group.bench_with_input(BenchmarkId::new(name, pool_size), pool_size, |b, _| {
                b.iter(|| {
                    ranker.rank_matches(black_box(&mentors), black_box(&mentees), black_box(3))
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_tag_overlap, bench_score_pair, bench_ranking);

criterion_main!(benches);
