// Endpoint registry: the fixed set of RobotEvents resources this client
// knows about, each mapped to a URL template with `{param}` placeholders.

use std::collections::{BTreeMap, HashMap};

use leon::Template;

use crate::error::{Error, Result};

/// Path parameters keyed by placeholder (or alias) name.
pub type PathParams = BTreeMap<String, String>;

/// A symbolic endpoint name and the path template it expands to,
/// relative to the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub template: &'static str,
}

pub const ENDPOINTS: &[Endpoint] = &[
    // Events
    Endpoint {
        name: "events",
        template: "/events",
    },
    Endpoint {
        name: "event",
        template: "/events/{id}",
    },
    Endpoint {
        name: "event_teams",
        template: "/events/{id}/teams",
    },
    Endpoint {
        name: "event_skills",
        template: "/events/{id}/skills",
    },
    Endpoint {
        name: "event_awards",
        template: "/events/{id}/awards",
    },
    Endpoint {
        name: "event_division_matches",
        template: "/events/{id}/divisions/{div}/matches",
    },
    Endpoint {
        name: "event_division_finalist_rankings",
        template: "/events/{id}/divisions/{div}/finalistRankings",
    },
    Endpoint {
        name: "event_division_rankings",
        template: "/events/{id}/divisions/{div}/rankings",
    },
    // Teams
    Endpoint {
        name: "teams",
        template: "/teams",
    },
    Endpoint {
        name: "team",
        template: "/teams/{id}",
    },
    Endpoint {
        name: "team_events",
        template: "/teams/{id}/events",
    },
    Endpoint {
        name: "team_matches",
        template: "/teams/{id}/matches",
    },
    Endpoint {
        name: "team_rankings",
        template: "/teams/{id}/rankings",
    },
    Endpoint {
        name: "team_skills",
        template: "/teams/{id}/skills",
    },
    Endpoint {
        name: "team_awards",
        template: "/teams/{id}/awards",
    },
    // Programs
    Endpoint {
        name: "programs",
        template: "/programs",
    },
    Endpoint {
        name: "program",
        template: "/programs/{id}",
    },
    // Seasons
    Endpoint {
        name: "seasons",
        template: "/seasons",
    },
    Endpoint {
        name: "season",
        template: "/seasons/{id}",
    },
    Endpoint {
        name: "season_events",
        template: "/seasons/{id}/events",
    },
];

/// Alternate parameter names accepted for a placeholder, in lookup order.
const ALIASES: &[(&str, &[&str])] = &[
    ("id", &["team_id", "event_id", "season_id", "program_id"]),
    ("div", &["division", "division_id"]),
];

/// Find a registered endpoint by its symbolic name.
pub fn lookup(name: &str) -> Result<&'static Endpoint> {
    ENDPOINTS
        .iter()
        .find(|e| e.name == name)
        .ok_or_else(|| Error::UnknownEndpoint(name.to_string()))
}

/// All registered endpoint names, in registry order.
pub fn names() -> Vec<&'static str> {
    ENDPOINTS.iter().map(|e| e.name).collect()
}

impl Endpoint {
    fn parse(&self) -> Result<Template<'static>> {
        Template::parse(self.template).map_err(|e| Error::template(self.template, e))
    }

    /// Placeholder names appearing in the template, in order.
    pub fn placeholders(&self) -> Result<Vec<String>> {
        let template = self.parse()?;
        Ok(template.keys().map(|k| k.to_string()).collect())
    }

    /// Substitute `params` into the template. A placeholder without a
    /// direct value falls back to its aliases.
    pub fn resolve(&self, params: &PathParams) -> Result<String> {
        let template = self.parse()?;
        let mut context: HashMap<String, String> = HashMap::new();
        for key in template.keys() {
            let key: &str = key;
            let value = params
                .get(key)
                .or_else(|| aliases_for(key).iter().find_map(|alias| params.get(*alias)))
                .ok_or_else(|| Error::missing_parameter(self.name, key))?;
            context.insert(key.to_string(), value.clone());
        }

        if context.is_empty() {
            return Ok(self.template.to_string());
        }
        template
            .render(&context)
            .map_err(|e| Error::template(self.template, e))
    }

    /// Human readable title, e.g. `team_events` -> `Team Events`.
    pub fn title(&self) -> String {
        title_case(self.name)
    }
}

fn aliases_for(key: &str) -> &'static [&'static str] {
    ALIASES
        .iter()
        .find(|(placeholder, _)| *placeholder == key)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[])
}

/// Replace underscores with spaces and capitalise every word.
pub fn title_case(s: &str) -> String {
    s.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
