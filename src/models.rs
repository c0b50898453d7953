// Static lookup tables for the teams and seasons offered in the prompts.

/// A named identifier known to the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Named {
    pub name: &'static str,
    pub id: u32,
}

pub const TEAMS: &[Named] = &[
    Named { name: "BH_A", id: 130515 },
    Named { name: "BH_B", id: 133493 },
    Named { name: "BH_C", id: 171257 },
    Named { name: "BH_X", id: 171256 },
];

/// VEX V5 seasons, newest first.
pub const SEASONS: &[Named] = &[
    Named { name: "VEX2526", id: 197 },
    Named { name: "VEX2425", id: 190 },
    Named { name: "VRC2324", id: 181 },
    Named { name: "VRC2223", id: 173 },
    Named { name: "VRC2122", id: 154 },
    Named { name: "VRC2021", id: 139 },
];

fn find(table: &[Named], name: &str) -> Option<u32> {
    table.iter().find(|n| n.name == name).map(|n| n.id)
}

pub fn team_id(name: &str) -> Option<u32> {
    find(TEAMS, name)
}

pub fn season_id(name: &str) -> Option<u32> {
    find(SEASONS, name)
}

pub fn team_names() -> Vec<&'static str> {
    TEAMS.iter().map(|t| t.name).collect()
}

pub fn season_names() -> Vec<&'static str> {
    SEASONS.iter().map(|s| s.name).collect()
}
