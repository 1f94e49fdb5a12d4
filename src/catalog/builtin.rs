use super::{Category, MetricDef, PatternDef, RoleDef, RuleCatalog};

struct CategorySpec {
    id: &'static str,
    name: &'static str,
    metrics: &'static [(&'static str, &'static str, f64)],
    patterns: &'static [(&'static str, &'static str, f64)],
}

const CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        id: "domainModel",
        name: "Domain Model & Business Logic",
        metrics: &[
            ("entities", "Entities", 4.0),
            ("businessRules", "Business Rules", 6.0),
            ("validations", "Validation Rules", 3.0),
        ],
        patterns: &[
            ("simple", "Simple CRUD", 1.0),
            ("ddd", "Domain-Driven Design", 1.6),
            ("cqrs", "CQRS", 1.4),
            ("eventSourced", "Event Sourced", 1.8),
        ],
    },
    CategorySpec {
        id: "dataAccess",
        name: "Data Access & Persistence",
        metrics: &[
            ("repositories", "Repositories", 6.0),
            ("dbContexts", "DbContext Configs", 4.0),
            ("migrations", "Migrations", 3.0),
        ],
        patterns: &[
            ("repository", "Basic Repository", 1.0),
            ("unitOfWork", "Unit of Work", 1.2),
            ("cqrsData", "CQRS Data", 1.5),
        ],
    },
    CategorySpec {
        id: "integration",
        name: "Integration & APIs",
        metrics: &[
            ("endpoints", "API Endpoints", 5.0),
            ("integrations", "External Integrations", 8.0),
            ("messageHandlers", "Message Handlers", 6.0),
        ],
        patterns: &[
            ("rest", "REST API", 1.0),
            ("graphql", "GraphQL", 1.3),
            ("grpc", "gRPC", 1.2),
        ],
    },
];

// Display names do not match the ids; saved projects depend on the ids.
const ROLES: &[(&str, &str, f64)] = &[
    ("developer", "Developer", 50.0),
    ("designer", "Senior Developer", 40.0),
    ("tester", "Team Lead", 30.0),
];

fn category(spec: &CategorySpec) -> Category {
    Category {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        metrics: spec
            .metrics
            .iter()
            .map(|(id, name, hours)| MetricDef {
                id: id.to_string(),
                name: name.to_string(),
                hours_per_unit: *hours,
            })
            .collect(),
        patterns: spec
            .patterns
            .iter()
            .map(|(id, name, multiplier)| PatternDef {
                id: id.to_string(),
                name: name.to_string(),
                multiplier: *multiplier,
            })
            .collect(),
    }
}

/// Build the built-in table. Every entry above declares at least one pattern.
pub(super) fn catalog() -> RuleCatalog {
    RuleCatalog {
        categories: CATEGORIES.iter().map(category).collect(),
        roles: ROLES
            .iter()
            .map(|(id, name, rate)| RoleDef {
                id: id.to_string(),
                name: name.to_string(),
                hourly_rate: *rate,
            })
            .collect(),
    }
}
