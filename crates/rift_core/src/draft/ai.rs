//! Automated drafters and the forced-turn fallback.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::{debug, warn};

use super::DraftState;
use crate::error::DraftError;
use crate::models::{ChampionCatalogue, ChampionId, Role, Side};

/// What a drafter did on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftAction {
    Ban(ChampionId),
    Pick(ChampionId),
}

/// Chooses bans and picks for a side. Implementations must only return champions that
/// are legal for the current turn, or `None` when nothing is.
pub trait DraftStrategy {
    fn choose_ban(
        &self,
        state: &DraftState,
        catalogue: &ChampionCatalogue,
        side: Side,
        rng: &mut dyn RngCore,
    ) -> Option<ChampionId>;

    fn choose_pick(
        &self,
        state: &DraftState,
        catalogue: &ChampionCatalogue,
        side: Side,
        role: Role,
        rng: &mut dyn RngCore,
    ) -> Option<ChampionId>;
}

fn legal_bans(state: &DraftState, catalogue: &ChampionCatalogue, side: Side) -> Vec<ChampionId> {
    catalogue
        .iter()
        .map(|c| c.id)
        .filter(|id| state.is_legal_ban(catalogue, *id, side))
        .collect()
}

fn legal_picks(state: &DraftState, catalogue: &ChampionCatalogue, side: Side) -> Vec<ChampionId> {
    catalogue
        .iter()
        .map(|c| c.id)
        .filter(|id| state.is_legal_pick(catalogue, *id, side))
        .collect()
}

/// Uniformly random legal choice. Used to auto-complete drafts nobody drove by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDrafter;

impl DraftStrategy for RandomDrafter {
    fn choose_ban(
        &self,
        state: &DraftState,
        catalogue: &ChampionCatalogue,
        side: Side,
        rng: &mut dyn RngCore,
    ) -> Option<ChampionId> {
        legal_bans(state, catalogue, side).choose(rng).copied()
    }

    fn choose_pick(
        &self,
        state: &DraftState,
        catalogue: &ChampionCatalogue,
        side: Side,
        _role: Role,
        rng: &mut dyn RngCore,
    ) -> Option<ChampionId> {
        legal_picks(state, catalogue, side).choose(rng).copied()
    }
}

// ============================================================================
// Tier lists
// ============================================================================

/// S, A, B, C tiers per role, strongest first.
static TIER_LIST: Lazy<HashMap<Role, [&'static [&'static str]; 4]>> = Lazy::new(|| {
    HashMap::from([
        (
            Role::Top,
            [
                &["K'Sante", "Aatrox", "Fiora", "Jax"][..],
                &["Darius", "Gwen", "Camille", "Sett", "Gnar"][..],
                &["Mordekaiser", "Shen", "Ornn", "Gangplank"][..],
                &["Malphite", "Teemo", "Urgot", "Nasus"][..],
            ],
        ),
        (
            Role::Jungle,
            [
                &["Bel'Veth", "Lee Sin", "Graves", "Vi"][..],
                &["Kayn", "Viego", "Kindred", "Hecarim"][..],
                &["Sejuani", "Rammus", "Warwick", "Nocturne"][..],
                &["Amumu", "Master Yi", "Shaco", "Nunu & Willump"][..],
            ],
        ),
        (
            Role::Mid,
            [
                &["Ahri", "Akali", "Viktor", "Syndra"][..],
                &["Zed", "Yasuo", "Katarina", "Vex"][..],
                &["Annie", "Lux", "Veigar", "Malzahar"][..],
                &["Ryze", "Twisted Fate", "Azir", "Galio"][..],
            ],
        ),
        (
            Role::Adc,
            [
                &["Kai'Sa", "Jinx", "Caitlyn", "Jhin"][..],
                &["Ezreal", "Lucian", "Vayne", "Tristana"][..],
                &["Ashe", "Miss Fortune", "Xayah", "Draven"][..],
                &["Sivir", "Twitch", "Kog'Maw", "Aphelios"][..],
            ],
        ),
        (
            Role::Support,
            [
                &["Thresh", "Lulu", "Nami", "Pyke"][..],
                &["Leona", "Nautilus", "Soraka", "Karma"][..],
                &["Senna", "Morgana", "Blitzcrank", "Janna"][..],
                &["Yuumi", "Zilean", "Taric", "Braum"][..],
            ],
        ),
    ])
});

/// Meta-aware drafter: picks from the best available tier for the role, bans S/A tier
/// champions of any role.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierListDrafter;

impl TierListDrafter {
    pub fn tier_of(role: Role, name: &str) -> Option<usize> {
        TIER_LIST
            .get(&role)
            .and_then(|tiers| tiers.iter().position(|tier| tier.contains(&name)))
    }
}

impl DraftStrategy for TierListDrafter {
    fn choose_ban(
        &self,
        state: &DraftState,
        catalogue: &ChampionCatalogue,
        side: Side,
        rng: &mut dyn RngCore,
    ) -> Option<ChampionId> {
        let legal = legal_bans(state, catalogue, side);
        let high_tier: Vec<ChampionId> = legal
            .iter()
            .copied()
            .filter(|id| {
                let name = catalogue.name(*id);
                Role::ALL.iter().any(|role| matches!(Self::tier_of(*role, name), Some(0 | 1)))
            })
            .collect();

        if let Some(choice) = high_tier.choose(rng) {
            return Some(*choice);
        }
        legal.choose(rng).copied()
    }

    fn choose_pick(
        &self,
        state: &DraftState,
        catalogue: &ChampionCatalogue,
        side: Side,
        role: Role,
        rng: &mut dyn RngCore,
    ) -> Option<ChampionId> {
        let legal = legal_picks(state, catalogue, side);
        for tier in 0..4 {
            let candidates: Vec<ChampionId> = legal
                .iter()
                .copied()
                .filter(|id| Self::tier_of(role, catalogue.name(*id)) == Some(tier))
                .collect();
            if let Some(choice) = candidates.choose(rng) {
                debug!(role = role.label(), tier, champion = catalogue.name(*choice), "tier pick");
                return Some(*choice);
            }
        }
        legal.choose(rng).copied()
    }
}

// ============================================================================
// Driving a draft
// ============================================================================

/// Resolve the current turn. `supplied` is applied when legal; otherwise the strategy's
/// choice is forced in its place.
pub fn force_action(
    state: &mut DraftState,
    catalogue: &ChampionCatalogue,
    supplied: Option<ChampionId>,
    strategy: &dyn DraftStrategy,
    rng: &mut dyn RngCore,
) -> Result<DraftAction, DraftError> {
    let phase = state.phase.ok_or(DraftError::DraftComplete)?;
    let side = state.current_side().ok_or(DraftError::DraftComplete)?;

    if let Some(champion) = supplied {
        let applied = if phase.is_ban() {
            state.apply_ban(catalogue, champion, side).map(|_| DraftAction::Ban(champion))
        } else {
            state.apply_pick(catalogue, champion, side).map(|_| DraftAction::Pick(champion))
        };
        match applied {
            Ok(action) => return Ok(action),
            Err(err) => warn!(%err, "supplied draft action rejected, forcing fallback"),
        }
    }

    if phase.is_ban() {
        let champion = strategy
            .choose_ban(state, catalogue, side, rng)
            .ok_or(DraftError::NoLegalChoice(side))?;
        state.apply_ban(catalogue, champion, side)?;
        Ok(DraftAction::Ban(champion))
    } else {
        let role = state.next_role_to_fill(side).ok_or(DraftError::RolesFilled(side))?;
        let champion = strategy
            .choose_pick(state, catalogue, side, role, rng)
            .ok_or(DraftError::NoLegalChoice(side))?;
        state.apply_pick(catalogue, champion, side)?;
        Ok(DraftAction::Pick(champion))
    }
}

/// Play every remaining turn with `strategy`.
pub fn auto_complete(
    state: &mut DraftState,
    catalogue: &ChampionCatalogue,
    strategy: &dyn DraftStrategy,
    rng: &mut dyn RngCore,
) -> Result<(), DraftError> {
    while !state.is_complete() {
        force_action(state, catalogue, None, strategy, rng)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{DraftPhase, BANS_PER_DRAFT, PICKS_PER_DRAFT};
    use crate::models::TeamId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_auto_complete_with_random_drafter() {
        let catalogue = ChampionCatalogue::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut state = DraftState::new(TeamId(0), TeamId(1));

        auto_complete(&mut state, &catalogue, &RandomDrafter, &mut rng).unwrap();
        assert!(state.is_complete());
        assert_eq!(state.bans.len(), BANS_PER_DRAFT);
        assert_eq!(state.picks.len(), PICKS_PER_DRAFT);
    }

    #[test]
    fn test_tier_list_drafter_prefers_top_tier() {
        let catalogue = ChampionCatalogue::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut state = DraftState::new(TeamId(0), TeamId(1));

        auto_complete(&mut state, &catalogue, &TierListDrafter, &mut rng).unwrap();

        for ban in &state.bans {
            let name = catalogue.name(ban.champion);
            assert!(
                Role::ALL.iter().any(|r| matches!(TierListDrafter::tier_of(*r, name), Some(0 | 1))),
                "{name} is not a high-tier ban"
            );
        }
        // Every role keeps at least seven S/A entries, far more than ten spread bans remove.
        for pick in &state.picks {
            let tier = TierListDrafter::tier_of(pick.role, catalogue.name(pick.champion));
            assert!(matches!(tier, Some(0 | 1)), "{} picked at {tier:?}", catalogue.name(pick.champion));
        }
    }

    #[test]
    fn test_force_action_applies_legal_supplied_choice() {
        let catalogue = ChampionCatalogue::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut state = DraftState::new(TeamId(0), TeamId(1));
        let ahri = catalogue.id_of("Ahri").unwrap();

        let action = force_action(&mut state, &catalogue, Some(ahri), &RandomDrafter, &mut rng).unwrap();
        assert_eq!(action, DraftAction::Ban(ahri));
        assert_eq!(state.bans[0].champion, ahri);
    }

    #[test]
    fn test_force_action_replaces_illegal_choice() {
        let catalogue = ChampionCatalogue::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut state = DraftState::new(TeamId(0), TeamId(1));
        let ahri = catalogue.id_of("Ahri").unwrap();
        state.apply_ban(&catalogue, ahri, Side::Blue).unwrap();

        // Ahri is gone, so Red's turn is forced.
        let action = force_action(&mut state, &catalogue, Some(ahri), &RandomDrafter, &mut rng).unwrap();
        match action {
            DraftAction::Ban(id) => assert_ne!(id, ahri),
            other => panic!("expected a ban, got {other:?}"),
        }
        assert_eq!(state.bans.len(), 2);
        assert_eq!(state.phase, Some(DraftPhase::BanPhase1));
    }

    #[test]
    fn test_no_legal_choice_is_reported() {
        let catalogue = ChampionCatalogue::from_entries(vec![
            ("A", vec![Role::Top]),
            ("B", vec![Role::Top]),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut state = DraftState::new(TeamId(0), TeamId(1));

        let err = auto_complete(&mut state, &catalogue, &RandomDrafter, &mut rng).unwrap_err();
        assert_eq!(err, DraftError::NoLegalChoice(Side::Blue));
        assert_eq!(state.bans.len(), 2);
    }
}
