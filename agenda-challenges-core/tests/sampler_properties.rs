mod common;

use std::collections::HashSet;

use agenda_challenges_core::error::SamplingError;
use agenda_challenges_core::pool::{parse_plain, parse_yaml, Category, Pool};
use agenda_challenges_core::sampler::{PageSampler, SamplingRules};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn agenda_pool() -> Pool {
    parse_yaml(common::CHALLENGES_YAML).expect("fixture pool")
}

#[test]
fn every_page_respects_size_distinctness_caps_and_minimums() {
    let pool = agenda_pool();

    for per_page in 1..=9 {
        let sampler = PageSampler::new(&pool, &SamplingRules::new(per_page))
            .unwrap_or_else(|e| panic!("per_page {per_page}: {e}"));
        let mut rng = StdRng::seed_from_u64(per_page as u64);

        for page in sampler.sample_pages(50, &mut rng).unwrap() {
            assert_eq!(page.len(), per_page);

            let distinct: HashSet<_> = page.lines().iter().collect();
            assert_eq!(distinct.len(), per_page, "duplicate line in {page:?}");

            assert!(page.count_in("tachadas") >= 1, "no tachada in {page:?}");
            for category in pool.categories() {
                assert!(
                    page.count_in(&category.name) <= category.cap(),
                    "category {} over cap in {page:?}",
                    category.name
                );
            }
        }
    }
}

#[test]
fn full_reachable_page_uses_every_cap() {
    let pool = agenda_pool();
    // 2 tachadas + 4 faciles + 3 dificiles
    let sampler = PageSampler::new(&pool, &SamplingRules::new(9)).unwrap();
    let page = sampler.sample_page(&mut StdRng::seed_from_u64(3)).unwrap();

    assert_eq!(page.count_in("tachadas"), 2);
    assert_eq!(page.count_in("faciles"), 4);
    assert_eq!(page.count_in("dificiles"), 3);

    let err = PageSampler::new(&pool, &SamplingRules::new(10)).unwrap_err();
    assert!(matches!(
        err,
        SamplingError::UnsatisfiableSamplingConstraints { requested: 10, .. }
    ));
}

#[test]
fn mandatory_rule_can_come_from_sampling_rules() {
    let pool = Pool::from_categories(vec![
        Category::new("faciles", vec!["f1".into(), "f2".into(), "f3".into()]),
        Category::new("raras", vec!["r1".into()]),
    ])
    .unwrap();
    let rules = SamplingRules::new(2).without_mandatory().with_mandatory("raras");
    let sampler = PageSampler::new(&pool, &rules).unwrap();

    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..30 {
        let page = sampler.sample_page(&mut rng).unwrap();
        assert_eq!(page.count_in("raras"), 1);
    }
}

#[test]
fn plain_pool_samples_without_replacement() {
    let pool = parse_plain("a\nb\nc\nd\ne\n").unwrap();
    let sampler = PageSampler::new(&pool, &SamplingRules::new(5).without_mandatory()).unwrap();
    let page = sampler.sample_page(&mut StdRng::seed_from_u64(5)).unwrap();

    let mut texts: Vec<_> = page.lines().iter().map(|l| l.text.clone()).collect();
    texts.sort();
    assert_eq!(texts, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn seeded_runs_reproduce_and_differ_across_seeds() {
    let pool = agenda_pool();
    let sampler = PageSampler::new(&pool, &SamplingRules::new(5)).unwrap();

    let first = sampler.sample_pages(10, &mut StdRng::seed_from_u64(2018)).unwrap();
    let again = sampler.sample_pages(10, &mut StdRng::seed_from_u64(2018)).unwrap();
    let other = sampler.sample_pages(10, &mut StdRng::seed_from_u64(2019)).unwrap();

    assert_eq!(first, again, "same seed must reproduce the same pages");
    assert_ne!(first, other, "different seeds should produce different pages");
}

#[test]
fn empty_mandatory_category_fails_before_sampling() {
    let pool = Pool::from_categories(vec![
        Category::new("faciles", vec!["f1".into(), "f2".into()]),
        Category::new("tachadas", vec![]).with_min_per_page(1),
    ])
    .unwrap();

    let err = PageSampler::new(&pool, &SamplingRules::new(1)).unwrap_err();
    assert!(matches!(
        err,
        SamplingError::MandatoryCategoryUnavailable { ref category, available: 0, .. } if category == "tachadas"
    ));
}

#[test]
fn default_rules_put_a_tachada_on_every_page() {
    // No `min_per_page` anywhere: the requirement comes from the rules alone.
    let pool = parse_yaml(
        "- name: tachadas\n  strikeout: true\n  lines: [t1]\n\
         - name: faciles\n  lines: [f1, f2, f3, f4, f5, f6, f7, f8, f9]\n",
    )
    .unwrap();
    let sampler = PageSampler::new(&pool, &SamplingRules::new(3)).unwrap();

    let mut rng = StdRng::seed_from_u64(100);
    for page in sampler.sample_pages(100, &mut rng).unwrap() {
        assert_eq!(page.count_in("tachadas"), 1, "no tachada in {page:?}");
    }
}

#[test]
fn default_rules_reject_a_pool_without_tachadas() {
    let pool = parse_yaml("- name: faciles\n  lines: [f1, f2, f3]\n").unwrap();

    let err = PageSampler::new(&pool, &SamplingRules::new(2)).unwrap_err();
    assert_eq!(
        err,
        SamplingError::MandatoryCategoryUnavailable {
            category: "tachadas".into(),
            available: 0,
            required: 1,
        }
    );
}
