use serde::{Deserialize, Serialize};

use super::{PlayerId, TeamId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub minute: u32,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fight: Option<FightResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade: Option<ObjectiveTrade>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    // Kills
    FirstBlood,
    SoloKill,
    DoubleKill,
    TripleKill,
    QuadraKill,
    PentaKill,

    // Team fights
    TeamFightWin,
    PerfectAce,
    ComebackFight,
    BaronFight,
    DragonFight,
    ElderExecute,

    // Objectives
    ObjectiveSteal,
    TowerDestroyed,
    DragonSecured,
    BaronSecured,
    InhibitorDestroyed,
    /// Both sides take an objective on opposite sides of the map.
    ObjectiveTrade,

    // Individual skill
    Outplay,
    JungleInvade,
    CounterGank,

    // Role specific
    TopSplitPush,
    MidRoam,
    AdcKiting,
    SupportVision,
    SupportSave,
    JungleObjective,
}

impl EventKind {
    /// Kinds drawn for non-fight events during a game.
    pub const SKIRMISHES: [EventKind; 12] = [
        EventKind::SoloKill,
        EventKind::ObjectiveSteal,
        EventKind::TowerDestroyed,
        EventKind::DragonSecured,
        EventKind::BaronSecured,
        EventKind::InhibitorDestroyed,
        EventKind::Outplay,
        EventKind::JungleInvade,
        EventKind::CounterGank,
        EventKind::TopSplitPush,
        EventKind::MidRoam,
        EventKind::ObjectiveTrade,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EventKind::FirstBlood => "First Blood",
            EventKind::SoloKill => "Solo Kill",
            EventKind::DoubleKill => "Double Kill",
            EventKind::TripleKill => "Triple Kill",
            EventKind::QuadraKill => "Quadra Kill",
            EventKind::PentaKill => "Penta Kill",
            EventKind::TeamFightWin => "Team Fight Victory",
            EventKind::PerfectAce => "Perfect Ace",
            EventKind::ComebackFight => "Comeback Fight",
            EventKind::BaronFight => "Baron Fight",
            EventKind::DragonFight => "Dragon Fight",
            EventKind::ElderExecute => "Elder Execute",
            EventKind::ObjectiveSteal => "Objective Steal",
            EventKind::TowerDestroyed => "Tower Destroyed",
            EventKind::DragonSecured => "Dragon Secured",
            EventKind::BaronSecured => "Baron Secured",
            EventKind::InhibitorDestroyed => "Inhibitor Destroyed",
            EventKind::ObjectiveTrade => "Objective Trade",
            EventKind::Outplay => "Outplay",
            EventKind::JungleInvade => "Jungle Invade",
            EventKind::CounterGank => "Counter Gank",
            EventKind::TopSplitPush => "Split Push Pressure",
            EventKind::MidRoam => "Successful Roam",
            EventKind::AdcKiting => "Perfect Kiting",
            EventKind::SupportVision => "Vision Control",
            EventKind::SupportSave => "Clutch Save",
            EventKind::JungleObjective => "Objective Control",
        }
    }

    /// Fluent message id used to render the event.
    pub fn message_id(&self) -> &'static str {
        match self {
            EventKind::FirstBlood => "first-blood",
            EventKind::SoloKill => "solo-kill",
            EventKind::DoubleKill => "double-kill",
            EventKind::TripleKill => "triple-kill",
            EventKind::QuadraKill => "quadra-kill",
            EventKind::PentaKill => "penta-kill",
            EventKind::TeamFightWin => "team-fight-win",
            EventKind::PerfectAce => "perfect-ace",
            EventKind::ComebackFight => "comeback-fight",
            EventKind::BaronFight => "baron-fight",
            EventKind::DragonFight => "dragon-fight",
            EventKind::ElderExecute => "elder-execute",
            EventKind::ObjectiveSteal => "objective-steal",
            EventKind::TowerDestroyed => "tower-destroyed",
            EventKind::DragonSecured => "dragon-secured",
            EventKind::BaronSecured => "baron-secured",
            EventKind::InhibitorDestroyed => "inhibitor-destroyed",
            EventKind::ObjectiveTrade => "objective-trade",
            EventKind::Outplay => "outplay",
            EventKind::JungleInvade => "jungle-invade",
            EventKind::CounterGank => "counter-gank",
            EventKind::TopSplitPush => "top-split-push",
            EventKind::MidRoam => "mid-roam",
            EventKind::AdcKiting => "adc-kiting",
            EventKind::SupportVision => "support-vision",
            EventKind::SupportSave => "support-save",
            EventKind::JungleObjective => "jungle-objective",
        }
    }

    pub fn is_team_fight(&self) -> bool {
        matches!(
            self,
            EventKind::TeamFightWin
                | EventKind::PerfectAce
                | EventKind::ComebackFight
                | EventKind::BaronFight
                | EventKind::DragonFight
                | EventKind::ElderExecute
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MultiKill {
    Double,
    Triple,
    Quadra,
    Penta,
}

impl MultiKill {
    pub fn from_kills(kills: u32) -> Option<Self> {
        match kills {
            2 => Some(MultiKill::Double),
            3 => Some(MultiKill::Triple),
            4 => Some(MultiKill::Quadra),
            5 => Some(MultiKill::Penta),
            _ => None,
        }
    }

    pub fn event_kind(&self) -> EventKind {
        match self {
            MultiKill::Double => EventKind::DoubleKill,
            MultiKill::Triple => EventKind::TripleKill,
            MultiKill::Quadra => EventKind::QuadraKill,
            MultiKill::Penta => EventKind::PentaKill,
        }
    }
}

/// Outcome of one simulated team fight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightResult {
    pub winner: TeamId,
    pub loser: TeamId,
    pub winner_kills: u32,
    pub loser_kills: u32,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mvp: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_kill: Option<(PlayerId, MultiKill)>,
}

impl FightResult {
    /// The losing side got no kills.
    pub fn was_ace(&self) -> bool {
        self.loser_kills == 0
    }

    pub fn was_close(&self) -> bool {
        self.winner_kills.abs_diff(self.loser_kills) <= 2
    }
}

// ============================================================================
// Dragons
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DragonType {
    Infernal,
    Ocean,
    Mountain,
    Cloud,
    Elder,
}

impl DragonType {
    pub const ALL: [DragonType; 5] = [
        DragonType::Infernal,
        DragonType::Ocean,
        DragonType::Mountain,
        DragonType::Cloud,
        DragonType::Elder,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DragonType::Infernal => "Infernal",
            DragonType::Ocean => "Ocean",
            DragonType::Mountain => "Mountain",
            DragonType::Cloud => "Cloud",
            DragonType::Elder => "Elder",
        }
    }
}

/// Per-side dragon buffs accumulated over a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragonState {
    pub infernal_stacks: u32,
    pub ocean_stacks: u32,
    pub mountain_stacks: u32,
    pub cloud_stacks: u32,
    pub has_elder: bool,
    pub dragon_soul: Option<DragonType>,
}

impl DragonState {
    pub fn add_dragon(&mut self, dragon: DragonType) {
        match dragon {
            DragonType::Infernal => self.infernal_stacks += 1,
            DragonType::Ocean => self.ocean_stacks += 1,
            DragonType::Mountain => self.mountain_stacks += 1,
            DragonType::Cloud => self.cloud_stacks += 1,
            DragonType::Elder => self.has_elder = true,
        }

        if self.dragon_soul.is_none() && self.elemental_total() >= 4 {
            // Ties go to the earliest element in declaration order.
            let stacks = [
                (DragonType::Infernal, self.infernal_stacks),
                (DragonType::Ocean, self.ocean_stacks),
                (DragonType::Mountain, self.mountain_stacks),
                (DragonType::Cloud, self.cloud_stacks),
            ];
            let mut best = stacks[0];
            for entry in &stacks[1..] {
                if entry.1 > best.1 {
                    best = *entry;
                }
            }
            self.dragon_soul = Some(best.0);
        }
    }

    pub fn elemental_total(&self) -> u32 {
        self.infernal_stacks + self.ocean_stacks + self.mountain_stacks + self.cloud_stacks
    }

    pub fn power_multiplier(&self) -> f64 {
        let mut multiplier = 1.0;
        multiplier += self.infernal_stacks as f64 * 0.04;
        multiplier += self.ocean_stacks as f64 * 0.03;
        multiplier += self.mountain_stacks as f64 * 0.03;
        multiplier += self.cloud_stacks as f64 * 0.02;
        if self.dragon_soul.is_some() {
            multiplier += 0.15;
        }
        if self.has_elder {
            multiplier += 0.20;
        }
        multiplier
    }
}

// ============================================================================
// Objective trades
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ObjectiveKind {
    Tower,
    Dragon,
    Baron,
    Inhibitor,
}

impl ObjectiveKind {
    pub const ALL: [ObjectiveKind; 4] = [
        ObjectiveKind::Tower,
        ObjectiveKind::Dragon,
        ObjectiveKind::Baron,
        ObjectiveKind::Inhibitor,
    ];

    pub fn value(&self) -> f64 {
        match self {
            ObjectiveKind::Tower => 1.0,
            ObjectiveKind::Dragon => 1.2,
            ObjectiveKind::Baron => 2.0,
            ObjectiveKind::Inhibitor => 1.5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ObjectiveKind::Tower => "Tower",
            ObjectiveKind::Dragon => "Dragon",
            ObjectiveKind::Baron => "Baron",
            ObjectiveKind::Inhibitor => "Inhibitor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTrade {
    pub team1: TeamId,
    pub team2: TeamId,
    pub team1_objective: ObjectiveKind,
    pub team2_objective: ObjectiveKind,
    pub team1_location: String,
    pub team2_location: String,
}

impl ObjectiveTrade {
    /// Value of team1's objective over team2's.
    pub fn value_ratio(&self) -> f64 {
        self.team1_objective.value() / self.team2_objective.value()
    }

    /// The side that came out clearly ahead, or `None` for an even trade.
    pub fn winner(&self) -> Option<TeamId> {
        let ratio = self.value_ratio();
        if ratio > 1.2 {
            Some(self.team1)
        } else if ratio < 0.8 {
            Some(self.team2)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dragon_soul_goes_to_most_stacked() {
        let mut state = DragonState::default();
        state.add_dragon(DragonType::Ocean);
        state.add_dragon(DragonType::Infernal);
        state.add_dragon(DragonType::Ocean);
        assert_eq!(state.dragon_soul, None);

        state.add_dragon(DragonType::Cloud);
        assert_eq!(state.dragon_soul, Some(DragonType::Ocean));

        // Soul is locked in once earned.
        state.add_dragon(DragonType::Infernal);
        state.add_dragon(DragonType::Infernal);
        assert_eq!(state.dragon_soul, Some(DragonType::Ocean));
    }

    #[test]
    fn test_dragon_soul_tie_prefers_declaration_order() {
        let mut state = DragonState::default();
        state.add_dragon(DragonType::Cloud);
        state.add_dragon(DragonType::Mountain);
        state.add_dragon(DragonType::Cloud);
        state.add_dragon(DragonType::Mountain);
        assert_eq!(state.dragon_soul, Some(DragonType::Mountain));
    }

    #[test]
    fn test_elder_does_not_count_toward_soul() {
        let mut state = DragonState::default();
        for _ in 0..3 {
            state.add_dragon(DragonType::Infernal);
        }
        state.add_dragon(DragonType::Elder);
        assert!(state.has_elder);
        assert_eq!(state.dragon_soul, None);
    }

    #[test]
    fn test_power_multiplier() {
        let mut state = DragonState::default();
        assert!((state.power_multiplier() - 1.0).abs() < 1e-9);

        state.add_dragon(DragonType::Infernal);
        state.add_dragon(DragonType::Infernal);
        state.add_dragon(DragonType::Ocean);
        state.add_dragon(DragonType::Cloud);
        state.add_dragon(DragonType::Elder);
        // 0.08 + 0.03 + 0.02 + soul 0.15 + elder 0.20
        assert!((state.power_multiplier() - 1.48).abs() < 1e-9);
    }

    #[test]
    fn test_objective_trade_winner() {
        let trade = |a, b| ObjectiveTrade {
            team1: TeamId(1),
            team2: TeamId(2),
            team1_objective: a,
            team2_objective: b,
            team1_location: "top lane".into(),
            team2_location: "Dragon pit".into(),
        };

        assert_eq!(trade(ObjectiveKind::Baron, ObjectiveKind::Tower).winner(), Some(TeamId(1)));
        assert_eq!(trade(ObjectiveKind::Tower, ObjectiveKind::Baron).winner(), Some(TeamId(2)));
        assert_eq!(trade(ObjectiveKind::Dragon, ObjectiveKind::Tower).winner(), None);
        assert_eq!(trade(ObjectiveKind::Inhibitor, ObjectiveKind::Dragon).winner(), Some(TeamId(1)));
    }

    #[test]
    fn test_fight_result_flags() {
        let fight = FightResult {
            winner: TeamId(0),
            loser: TeamId(1),
            winner_kills: 5,
            loser_kills: 0,
            location: "mid lane".into(),
            objective: None,
            mvp: None,
            multi_kill: None,
        };
        assert!(fight.was_ace());
        assert!(!fight.was_close());
        assert_eq!(MultiKill::from_kills(5), Some(MultiKill::Penta));
        assert_eq!(MultiKill::from_kills(1), None);
    }
}
