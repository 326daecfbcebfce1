//! Per-entity query builders
//!
//! One generic [`ObjectQuery`] parameterized by a per-entity
//! [`EntityConfig`] record: the logical alias, the default field, the
//! relationship-traversal wiring, and the GRE scope. Relationship
//! resolution is a pluggable strategy — a resolver holds the related
//! builder's constructor as a capability, and every nested render passes
//! through a call-depth guard so mutually-referencing configurations fail
//! loudly instead of recursing.

use chrono::NaiveDate;
use tracing::{debug, warn};

use gus_core::error::QueryError;
use gus_schema::SchemaRegistry;

use crate::assemble::{FieldList, SortDirection};
use crate::filters::{self, bracket, FilterResult, Fragment, Lenient};
use crate::shifts::{self, Shift};
use crate::spec::{Combine, QuerySpec};

/// Hardcoded team scope behind the GRE convenience queries.
const GRE_TEAMS: [&str; 2] = ["Release Management", "Global Release Engineering"];

/// Most nested relationship renders allowed before resolution is aborted.
const MAX_RESOLVE_DEPTH: usize = 4;

/// Capability handle for constructing a related entity's builder
type RelatedBuilder = for<'r> fn(&'r SchemaRegistry) -> ObjectQuery<'r>;

// Free functions so the constructors coerce to the higher-ranked
// `RelatedBuilder` pointer inside the entity constants.
fn case_builder(registry: &SchemaRegistry) -> ObjectQuery<'_> {
    ObjectQuery::case(registry)
}

fn scrum_member_builder(registry: &SchemaRegistry) -> ObjectQuery<'_> {
    ObjectQuery::scrum_member(registry)
}

/// How caller-supplied keys become the relation field's value expression
#[derive(Debug, Clone, Copy)]
enum Resolver {
    /// Keys are raw foreign keys; substitute them literally.
    Direct,
    /// Keys are business keys on a related entity; resolve them through a
    /// nested query selecting `select_field` where `match_field` matches.
    Subquery {
        related: RelatedBuilder,
        match_field: &'static str,
        select_field: &'static str,
    },
}

/// Relationship-traversal wiring for one entity
#[derive(Debug, Clone, Copy)]
struct Relation {
    /// Field alias on this entity holding the related key
    key_field: &'static str,
    resolver: Resolver,
}

/// How the GRE convenience scope applies to one entity
#[derive(Debug, Clone, Copy)]
enum GreScope {
    /// No GRE variant for this entity
    None,
    /// The team OR-pair directly on this entity's team field
    TeamField(&'static str),
    /// Membership in the related entity's GRE result set
    Membership {
        key_field: &'static str,
        related: RelatedBuilder,
        select_field: &'static str,
    },
}

/// Per-entity configuration record
#[derive(Debug, Clone, Copy)]
pub struct EntityConfig {
    alias: &'static str,
    default_field: &'static str,
    relation: Option<Relation>,
    gre: GreScope,
}

impl EntityConfig {
    const CASE: Self = Self {
        alias: "Case",
        default_field: "Id",
        relation: None,
        gre: GreScope::TeamField("Team"),
    };

    const COMMENT: Self = Self {
        alias: "CaseComment",
        default_field: "Id",
        relation: Some(Relation {
            key_field: "Parent",
            resolver: Resolver::Subquery {
                related: case_builder,
                match_field: "CaseNumber",
                select_field: "Id",
            },
        }),
        gre: GreScope::Membership {
            key_field: "Parent",
            related: case_builder,
            select_field: "Id",
        },
    };

    const CHATTER: Self = Self {
        alias: "Chatter",
        default_field: "Id",
        relation: Some(Relation {
            key_field: "Parent",
            resolver: Resolver::Direct,
        }),
        gre: GreScope::Membership {
            key_field: "Parent",
            related: case_builder,
            select_field: "Id",
        },
    };

    const ATTACHMENT: Self = Self {
        alias: "Attachment",
        default_field: "Id",
        relation: Some(Relation {
            key_field: "Parent",
            resolver: Resolver::Subquery {
                related: case_builder,
                match_field: "CaseNumber",
                select_field: "Id",
            },
        }),
        gre: GreScope::Membership {
            key_field: "Parent",
            related: case_builder,
            select_field: "Id",
        },
    };

    const CI_STEP: Self = Self {
        alias: "CIStep",
        default_field: "Id",
        relation: Some(Relation {
            key_field: "Case",
            resolver: Resolver::Subquery {
                related: case_builder,
                match_field: "CaseNumber",
                select_field: "Id",
            },
        }),
        gre: GreScope::Membership {
            key_field: "Case",
            related: case_builder,
            select_field: "Id",
        },
    };

    const RELEASE: Self = Self {
        alias: "Release",
        default_field: "Id",
        relation: None,
        gre: GreScope::None,
    };

    const RELEASE_EVENT: Self = Self {
        alias: "ReleaseEvent",
        default_field: "Case",
        relation: Some(Relation {
            key_field: "Case",
            resolver: Resolver::Subquery {
                related: case_builder,
                match_field: "CaseNumber",
                select_field: "Id",
            },
        }),
        gre: GreScope::Membership {
            key_field: "Case",
            related: case_builder,
            select_field: "Id",
        },
    };

    const TASK: Self = Self {
        alias: "Task",
        default_field: "Subject",
        relation: Some(Relation {
            key_field: "What",
            resolver: Resolver::Direct,
        }),
        gre: GreScope::Membership {
            key_field: "What",
            related: case_builder,
            select_field: "Id",
        },
    };

    const SCRUM_MEMBER: Self = Self {
        alias: "ScrumMember",
        default_field: "MemberName",
        relation: Some(Relation {
            key_field: "TeamName",
            resolver: Resolver::Direct,
        }),
        gre: GreScope::TeamField("TeamName"),
    };

    const USER: Self = Self {
        alias: "User",
        default_field: "Name",
        relation: Some(Relation {
            key_field: "Id",
            resolver: Resolver::Direct,
        }),
        gre: GreScope::Membership {
            key_field: "Id",
            related: scrum_member_builder,
            select_field: "MemberName",
        },
    };

    const CTC_LOCK: Self = Self {
        alias: "CTCLock",
        default_field: "Id",
        relation: None,
        gre: GreScope::None,
    };

    const INSTANCE_DATACENTER: Self = Self {
        alias: "InstanceDatacenter",
        default_field: "PodName",
        relation: None,
        gre: GreScope::None,
    };

    const APPRISE_LOG: Self = Self {
        alias: "AppriseLogs",
        default_field: "Id",
        relation: None,
        gre: GreScope::None,
    };
}

/// Caller-supplied relationship keys, one value or several
///
/// A list is normalized to a comma-joined string; a single string that
/// already contains a comma counts as multiple values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySet(String);

impl KeySet {
    /// The normalized comma-joined form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check if no keys were supplied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn is_multiple(&self) -> bool {
        self.0.contains(',')
    }
}

impl From<&str> for KeySet {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for KeySet {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Vec<String>> for KeySet {
    fn from(values: Vec<String>) -> Self {
        Self(values.join(","))
    }
}

impl From<Vec<&str>> for KeySet {
    fn from(values: Vec<&str>) -> Self {
        Self(values.join(","))
    }
}

/// Anything acceptable to [`ObjectQuery::filter`]
///
/// Fallible filter constructions are handled leniently: an error is logged
/// and the filter dropped, keeping the builder chain alive.
pub trait IntoFragment {
    fn into_fragment(self) -> Option<Fragment>;
}

impl IntoFragment for Fragment {
    fn into_fragment(self) -> Option<Fragment> {
        Some(self)
    }
}

impl IntoFragment for Option<Fragment> {
    fn into_fragment(self) -> Option<Fragment> {
        self
    }
}

impl IntoFragment for FilterResult {
    fn into_fragment(self) -> Option<Fragment> {
        self.lenient()
    }
}

/// Query builder for one logical entity
#[derive(Debug, Clone)]
pub struct ObjectQuery<'r> {
    registry: &'r SchemaRegistry,
    config: EntityConfig,
    spec: QuerySpec,
    depth: usize,
}

impl<'r> ObjectQuery<'r> {
    fn with_config(registry: &'r SchemaRegistry, config: EntityConfig) -> Self {
        let mut spec = QuerySpec::new();
        spec.set_fields(FieldList::Raw(
            registry.resolve_field(config.alias, config.default_field),
        ));
        Self {
            registry,
            config,
            spec,
            depth: 0,
        }
    }

    /// Support cases
    pub fn case(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::CASE)
    }

    /// Case comments
    pub fn comment(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::COMMENT)
    }

    /// Chatter feed items
    pub fn chatter(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::CHATTER)
    }

    /// Case attachments
    pub fn attachment(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::ATTACHMENT)
    }

    /// CI pipeline steps
    pub fn ci_step(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::CI_STEP)
    }

    /// Releases
    pub fn release(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::RELEASE)
    }

    /// Scheduled release events
    pub fn release_event(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::RELEASE_EVENT)
    }

    /// Activity history tasks
    pub fn task(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::TASK)
    }

    /// Scrum team members
    pub fn scrum_member(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::SCRUM_MEMBER)
    }

    /// Users
    pub fn user(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::USER)
    }

    /// Change-traffic-control locks
    pub fn ctc_lock(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::CTC_LOCK)
    }

    /// Cluster/instance links share the lock object.
    pub fn cluster_instance_link(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::CTC_LOCK)
    }

    /// Datacenter instances
    pub fn instance_datacenter(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::INSTANCE_DATACENTER)
    }

    /// Apprise notification logs
    pub fn apprise_log(registry: &'r SchemaRegistry) -> Self {
        Self::with_config(registry, EntityConfig::APPRISE_LOG)
    }

    /// The logical name this builder queries.
    pub fn alias(&self) -> &'static str {
        self.config.alias
    }

    /// Replace the selected fields.
    pub fn fields(mut self, fields: impl Into<FieldList>) -> Self {
        self.spec.set_fields(fields);
        self
    }

    /// Merge a predicate into the filter with AND.
    pub fn filter(mut self, expr: impl IntoFragment) -> Self {
        if let Some(fragment) = expr.into_fragment() {
            self.spec.merge_filter(fragment, Combine::And);
        }
        self
    }

    /// Merge a predicate into the filter with OR.
    pub fn filter_any(mut self, expr: impl IntoFragment) -> Self {
        if let Some(fragment) = expr.into_fragment() {
            self.spec.merge_filter(fragment, Combine::Or);
        }
        self
    }

    /// Sort the result set.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.spec.set_sort(field, direction);
        self
    }

    /// Cap the result set.
    pub fn limit(mut self, rows: u32) -> Self {
        self.spec.set_limit(rows);
        self
    }

    /// Cap the result set at the conventional default.
    pub fn default_limit(mut self) -> Self {
        self.spec.set_default_limit();
        self
    }

    /// Constrain the query to the GRE organizational scope.
    ///
    /// The two team predicates combine with OR (the scope is a union of
    /// teams); on entities without a team field the scope resolves through
    /// the related entity's GRE query instead.
    pub fn gre(mut self) -> Self {
        let fragment = match self.config.gre {
            GreScope::None => {
                warn!(alias = self.config.alias, "no GRE scope defined, leaving query unchanged");
                None
            }
            GreScope::TeamField(team_alias) => {
                let team_field = self.registry.resolve_field(self.config.alias, team_alias);
                gre_team_filter(&team_field)
            }
            GreScope::Membership {
                key_field,
                related,
                select_field,
            } => match self.gre_membership(key_field, related, select_field) {
                Ok(fragment) => fragment,
                Err(err) => {
                    warn!(%err, alias = self.config.alias, "GRE scope resolution failed");
                    None
                }
            },
        };
        if let Some(fragment) = fragment {
            self.spec.merge_filter(fragment, Combine::And);
        }
        self
    }

    /// Constrain datacenter instances to those in a go-live lifecycle.
    pub fn go_live(mut self) -> Self {
        let lifecycle = self.registry.resolve_field(self.config.alias, "Lifecycle");
        if let Some(fragment) = filters::like(&lifecycle, "*Go Live*").lenient() {
            self.spec.merge_filter(fragment, Combine::And);
        }
        self
    }

    /// Constrain to records overlapping the named shift window.
    ///
    /// Uses the entity's `Start`/`End` field aliases. A day/shift
    /// combination with no defined window leaves the query without a time
    /// filter.
    pub fn within_shift(mut self, date: NaiveDate, shift: Shift) -> Self {
        let window = match shifts::resolve(date, shift) {
            Some(window) => window,
            None => {
                debug!(shift = shift.as_str(), %date, "no shift window defined, omitting time filter");
                return self;
            }
        };
        let start_field = self.registry.resolve_field(self.config.alias, "Start");
        let end_field = self.registry.resolve_field(self.config.alias, "End");
        let bounds: Vec<Fragment> = [
            filters::before(&start_field, &window.end_literal()),
            filters::after(&end_field, &window.start_literal()),
        ]
        .into_iter()
        .filter_map(Lenient::lenient)
        .collect();
        if let Some(fragment) = filters::all_of(&bounds).lenient() {
            self.spec.merge_filter(fragment, Combine::And);
        }
        self
    }

    /// Render the query.
    pub fn build(self) -> Result<String, QueryError> {
        let object = self.registry.resolve_object(self.config.alias);
        self.spec.render(&object)
    }

    /// Resolve relationship keys into a filter, then render the query.
    ///
    /// A single key becomes an equality filter, several keys an `IN`
    /// filter; business keys are first resolved through the related
    /// entity's own query as a nested subquery. An empty key set adds no
    /// filter at all.
    pub fn build_for(mut self, keys: impl Into<KeySet>) -> Result<String, QueryError> {
        let keys = keys.into();
        self.apply_relation(&keys)?;
        self.build()
    }

    fn apply_relation(&mut self, keys: &KeySet) -> Result<(), QueryError> {
        if keys.is_empty() {
            debug!(alias = self.config.alias, "no keys supplied, skipping relationship filter");
            return Ok(());
        }
        let relation = match self.config.relation {
            Some(relation) => relation,
            None => return Err(QueryError::NoRelation(self.config.alias)),
        };
        let key_field = self
            .registry
            .resolve_field(self.config.alias, relation.key_field);
        let fragment = match relation.resolver {
            Resolver::Direct => {
                if keys.is_multiple() {
                    filters::is_in(&key_field, &bracket(keys.as_str())).lenient()
                } else {
                    filters::equals(&key_field, keys.as_str()).lenient()
                }
            }
            Resolver::Subquery {
                related,
                match_field,
                select_field,
            } => {
                let nested = self.related_query(related, match_field, select_field, keys)?;
                if keys.is_multiple() {
                    filters::is_in(&key_field, &bracket(&nested)).lenient()
                } else {
                    Some(Fragment::raw(format!("{} = {}", key_field, bracket(&nested))))
                }
            }
        };
        if let Some(fragment) = fragment {
            self.spec.merge_filter(fragment, Combine::And);
        }
        Ok(())
    }

    /// Render the related entity's query matching `keys`, selecting the
    /// field the outer filter compares against.
    fn related_query(
        &self,
        related: RelatedBuilder,
        match_field: &'static str,
        select_field: &'static str,
        keys: &KeySet,
    ) -> Result<String, QueryError> {
        let mut nested = self.descend(related)?;
        let match_field = nested
            .registry
            .resolve_field(nested.config.alias, match_field);
        let matcher = if keys.is_multiple() {
            filters::is_in(&match_field, &bracket(keys.as_str()))
        } else {
            filters::equals(&match_field, keys.as_str())
        };
        if let Some(fragment) = matcher.lenient() {
            nested.spec.merge_filter(fragment, Combine::And);
        }
        let select = nested
            .registry
            .resolve_field(nested.config.alias, select_field);
        nested.spec.set_fields(FieldList::Raw(select));
        nested.build()
    }

    fn gre_membership(
        &self,
        key_field: &'static str,
        related: RelatedBuilder,
        select_field: &'static str,
    ) -> Result<Option<Fragment>, QueryError> {
        let mut nested = self.descend(related)?;
        let select = nested
            .registry
            .resolve_field(nested.config.alias, select_field);
        nested.spec.set_fields(FieldList::Raw(select));
        let rendered = nested.gre().build()?;
        let key = self.registry.resolve_field(self.config.alias, key_field);
        Ok(filters::is_in(&key, &bracket(&rendered)).lenient())
    }

    fn descend(&self, related: RelatedBuilder) -> Result<ObjectQuery<'r>, QueryError> {
        if self.depth >= MAX_RESOLVE_DEPTH {
            return Err(QueryError::ResolveDepthExceeded(MAX_RESOLVE_DEPTH));
        }
        let mut nested = related(self.registry);
        nested.depth = self.depth + 1;
        Ok(nested)
    }
}

/// `(team = 'Release Management' OR team = 'Global Release Engineering')`
fn gre_team_filter(team_field: &str) -> Option<Fragment> {
    let teams: Vec<Fragment> = GRE_TEAMS
        .iter()
        .filter_map(|team| filters::equals(team_field, team).lenient())
        .collect();
    filters::any_of(&teams)
        .lenient()
        .map(|joined| Fragment::raw(bracket(joined.as_str())))
}
