use estimate_forge::calculator::*;
use estimate_forge::catalog::RuleCatalog;
use estimate_forge::models::*;
use speculate2::speculate;

fn domain_item(entities: u32, business_rules: u32, validations: u32) -> EstimateItem {
    let category = RuleCatalog::builtin().category("domainModel").unwrap();
    let mut item = EstimateItem::new(1, category, Some("developer".to_string()));
    item.metrics.insert("entities".to_string(), entities);
    item.metrics.insert("businessRules".to_string(), business_rules);
    item.metrics.insert("validations".to_string(), validations);
    item
}

/// REST integration item worth `endpoints` × 5 hours.
fn endpoint_item(id: u64, endpoints: u32) -> EstimateItem {
    let category = RuleCatalog::builtin().category("integration").unwrap();
    let mut item = EstimateItem::new(id, category, None);
    item.metrics.insert("endpoints".to_string(), endpoints);
    item
}

speculate! {
    before {
        let catalog = RuleCatalog::builtin();
    }

    describe "compute_item_effort" {
        it "sums metric hours for a simple medium item" {
            let effort = compute_item_effort(&domain_item(2, 1, 0), catalog);
            assert_eq!(effort.hours, 14);
            assert_eq!(effort.days, 1.8);
        }

        it "applies the pattern multiplier" {
            let mut item = domain_item(2, 1, 0);
            item.pattern = "eventSourced".to_string();

            let effort = compute_item_effort(&item, catalog);
            assert_eq!(effort.hours, 25);
            assert_eq!(effort.days, 3.1);
        }

        it "applies the complexity multiplier" {
            let mut item = domain_item(2, 1, 0);
            item.complexity = ComplexityTier::High;
            let high = compute_item_effort(&item, catalog);
            assert_eq!(high.hours, 18);
            assert_eq!(high.days, 2.3);

            item.complexity = ComplexityTier::Low;
            let low = compute_item_effort(&item, catalog);
            assert_eq!(low.hours, 11);
            assert_eq!(low.days, 1.4);
        }

        it "multiplies every secondary factor" {
            let mut item = domain_item(2, 1, 0);
            item.complexity_factors.set("dependencies", 1.5);

            let effort = compute_item_effort(&item, catalog);
            assert_eq!(effort.hours, 21);
            assert_eq!(effort.days, 2.6);
        }

        it "treats missing secondary factors as neutral" {
            let mut item = domain_item(2, 1, 0);
            item.complexity_factors = ComplexityFactors::empty();

            assert_eq!(compute_item_effort(&item, catalog).hours, 14);
        }

        it "rounds half hours up" {
            let mut item = domain_item(0, 0, 1);
            item.complexity_factors.set("dependencies", 1.5);

            assert_eq!(compute_item_effort(&item, catalog).hours, 5);
        }

        it "ignores metrics the category does not define" {
            let mut item = domain_item(2, 1, 0);
            item.metrics.insert("endpoints".to_string(), 10);

            assert_eq!(compute_item_effort(&item, catalog).hours, 14);
        }

        it "gives zero effort for zeroed metrics" {
            let effort = compute_item_effort(&domain_item(0, 0, 0), catalog);
            assert_eq!(effort, Effort { hours: 0, days: 0.0 });
        }

        it "returns the same effort on every call" {
            let item = domain_item(7, 3, 9);
            assert_eq!(
                compute_item_effort(&item, catalog),
                compute_item_effort(&item, catalog)
            );
        }
    }

    describe "evaluate_item" {
        it "has no warnings for a catalog-valid item" {
            let estimate = evaluate_item(&domain_item(2, 1, 0), catalog);
            assert!(!estimate.is_stale());
        }

        it "gives zero hours for an unknown category" {
            let mut item = domain_item(2, 1, 0);
            item.category = "frontend".to_string();

            let estimate = evaluate_item(&item, catalog);
            assert_eq!(estimate.effort.hours, 0);
            assert_eq!(
                estimate.warnings,
                vec![StaleReference::Category("frontend".to_string())]
            );
        }

        it "uses a neutral multiplier for an unknown pattern" {
            let mut item = domain_item(2, 1, 0);
            item.pattern = "soap".to_string();

            let estimate = evaluate_item(&item, catalog);
            assert_eq!(estimate.effort.hours, 14);
            assert_eq!(
                estimate.warnings,
                vec![StaleReference::Pattern {
                    category: "domainModel".to_string(),
                    pattern: "soap".to_string(),
                }]
            );
        }

        it "flags an unknown role without changing effort" {
            let mut item = domain_item(2, 1, 0);
            item.role = Some("architect".to_string());

            let estimate = evaluate_item(&item, catalog);
            assert_eq!(estimate.effort.hours, 14);
            assert_eq!(estimate.warnings, vec![StaleReference::Role("architect".to_string())]);
        }
    }

    describe "compute_total" {
        it "is zero for no items" {
            let total = compute_total(&Vec::<EstimateItem>::new(), catalog);
            assert_eq!(total, Effort::default());
        }

        it "sums hours and already rounded days" {
            let items = vec![endpoint_item(1, 1), endpoint_item(2, 1)];
            assert_eq!(compute_item_effort(&items[0], catalog).days, 0.6);

            let total = compute_total(&items, catalog);
            assert_eq!(total.hours, 10);
            assert_eq!(total.days, 1.2);
            // Recomputing from the summed hours would give a different answer.
            assert_eq!(hours_to_days(total.hours), 1.3);
        }

        it "matches recomputation when nothing was rounded" {
            let items = vec![domain_item(1, 0, 0), domain_item(1, 0, 0)];
            let total = compute_total(&items, catalog);
            assert_eq!(total, Effort { hours: 8, days: 1.0 });
        }

        it "saturates instead of overflowing on huge multipliers" {
            let mut items = vec![domain_item(1, 0, 0), domain_item(1, 0, 0)];
            for item in &mut items {
                item.complexity_factors.set("dependencies", 1e300);
                item.complexity_factors.set("integrations", 1e300);
            }
            assert_eq!(compute_item_effort(&items[0], catalog).hours, u64::MAX);

            let total = compute_total(&items, catalog);
            assert_eq!(total.hours, u64::MAX);
            assert!(total.days.is_finite());
        }
    }

    describe "bug fixing allowance" {
        it "is a fifth of the days rounded to one decimal" {
            assert_eq!(bug_fixing_allowance(1.8), 0.4);
            assert_eq!(bug_fixing_allowance(3.1), 0.6);
            assert_eq!(bug_fixing_allowance(0.0), 0.0);
        }

        it "adds up with the days" {
            assert_eq!(days_with_allowance(1.8), 2.2);
            assert_eq!(days_with_allowance(3.1), 3.7);
        }
    }

    describe "compute_item_cost" {
        it "multiplies hours by the flat role rate" {
            assert_eq!(compute_item_cost(&domain_item(2, 1, 0), catalog), Some(700.0));
        }

        it "is none without a role" {
            let mut item = domain_item(2, 1, 0);
            item.role = None;
            assert_eq!(compute_item_cost(&item, catalog), None);
        }

        it "is none for an unknown role" {
            let mut item = domain_item(2, 1, 0);
            item.role = Some("architect".to_string());
            assert_eq!(compute_item_cost(&item, catalog), None);
        }
    }

    describe "rounding helpers" {
        it "rounds halves up" {
            assert_eq!(round_half_up(2.5), 3.0);
            assert_eq!(round_half_up(2.49), 2.0);
            assert_eq!(round_to_tenth(0.625), 0.6);
            assert_eq!(round_to_tenth(1.25), 1.3);
        }
    }
}
