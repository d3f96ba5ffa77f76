//! Match settlement: the pure computation run once when a match finishes.
//!
//! Takes the roster (with pre-match elo snapshots) and the round pairings and
//! derives per-player win/loss counts, elo deltas, xp gains and bonus awards,
//! together with a per-player ledger that justifies every delta. The ledger
//! is shown to players, so the sum of its entries must equal the reported
//! totals exactly.

use std::collections::HashMap;

use crate::models::match_session::{RosterPlayer, RoundPairing, MAX_ROUND_SCORE};
use crate::models::player::DEFAULT_ELO;
use crate::models::settlement::{
    BreakdownEntry, PlayerBreakdown, PlayerSettlement, SettlementOutcome, SettlementRecord,
};

pub const WIN_XP: i32 = 15;
pub const LOSS_XP: i32 = 5;
pub const WIN_ELO: i32 = 20;
pub const PERFECT_WIN_XP: i32 = 50;
pub const ULTIMATE_WIN_XP: i32 = 25;
pub const ULTIMATE_WIN_ELO: i32 = 6;
pub const ULTIMATE_WIN_OTHERS_ELO: i32 = -2;
pub const ULTIMATE_LOSS_ELO: i32 = -3;
pub const ULTIMATE_LOSS_OTHERS_ELO: i32 = 1;
pub const STRENGTH_ADJ_DIVISOR: i32 = 25;
pub const STRENGTH_ADJ_CAP: i32 = 10;

#[derive(Default)]
struct Tally {
    wins: i32,
    loses: i32,
    games: i32,
    xp: i32,
    elo_delta: i32,
    perfect_wins: i32,
    elo_entries: Vec<BreakdownEntry>,
    xp_entries: Vec<BreakdownEntry>,
}

impl Tally {
    fn add_elo(&mut self, reason: String, round: Option<usize>, delta: i32) {
        self.elo_delta += delta;
        self.elo_entries.push(BreakdownEntry {
            reason,
            round,
            delta,
        });
    }

    fn add_xp(&mut self, reason: String, round: Option<usize>, delta: i32) {
        self.xp += delta;
        self.xp_entries.push(BreakdownEntry {
            reason,
            round,
            delta,
        });
    }
}

fn tally<'a>(tallies: &'a mut HashMap<String, Tally>, id: &str) -> &'a mut Tally {
    tallies.entry(id.to_string()).or_default()
}

/// Average elo of a two-player team, rounded to nearest. Unknown players
/// count as the default rating.
fn team_average(team: &[String; 2], elo_by_id: &HashMap<&str, i32>) -> i32 {
    let sum: i32 = team
        .iter()
        .map(|id| *elo_by_id.get(id.as_str()).unwrap_or(&DEFAULT_ELO))
        .sum();
    (sum as f64 / 2.0).round() as i32
}

/// Settles a finished match. Pure: reads nothing but its arguments and
/// performs no I/O, so it can be exercised without any datastore.
pub fn settle(roster: &[RosterPlayer], rounds: &[RoundPairing]) -> SettlementOutcome {
    let elo_by_id: HashMap<&str, i32> = roster.iter().map(|p| (p.id.as_str(), p.elo)).collect();

    let mut tallies: HashMap<String, Tally> = HashMap::new();
    for player in roster {
        tallies.entry(player.id.clone()).or_default();
    }

    for (index, round) in rounds.iter().enumerate() {
        let number = index + 1;

        // A tie moves nothing, but the round still counts as played.
        if round.score_a == round.score_b {
            for id in round.participants() {
                tally(&mut tallies, id).games += 1;
            }
            continue;
        }

        let (winners, losers, win_score, lose_score) = if round.score_a > round.score_b {
            (&round.team_a, &round.team_b, round.score_a, round.score_b)
        } else {
            (&round.team_b, &round.team_a, round.score_b, round.score_a)
        };

        let winner_avg = team_average(winners, &elo_by_id);
        let loser_avg = team_average(losers, &elo_by_id);
        let adj = ((winner_avg - loser_avg).abs() / STRENGTH_ADJ_DIVISOR).min(STRENGTH_ADJ_CAP);
        let perfect = win_score == MAX_ROUND_SCORE && lose_score == 0;

        for id in winners {
            let t = tally(&mut tallies, id);
            t.wins += 1;
            t.games += 1;
            t.add_xp(format!("round {}: win", number), Some(number), WIN_XP);
            t.add_elo(format!("round {}: win", number), Some(number), WIN_ELO);
            if perfect {
                t.perfect_wins += 1;
                t.add_xp(
                    format!("round {}: perfect win", number),
                    Some(number),
                    PERFECT_WIN_XP,
                );
            }
            if adj != 0 {
                if winner_avg > loser_avg {
                    t.add_elo(
                        format!("round {}: stronger team penalty", number),
                        Some(number),
                        -adj,
                    );
                } else {
                    t.add_elo(
                        format!("round {}: underdog bonus", number),
                        Some(number),
                        adj,
                    );
                }
            }
        }

        for id in losers {
            let t = tally(&mut tallies, id);
            t.loses += 1;
            t.games += 1;
            t.add_xp(format!("round {}: loss", number), Some(number), LOSS_XP);
            t.add_elo(format!("round {}: loss", number), Some(number), -WIN_ELO);
            if adj != 0 {
                if winner_avg > loser_avg {
                    t.add_elo(
                        format!("round {}: weaker team compensation", number),
                        Some(number),
                        adj,
                    );
                } else {
                    t.add_elo(
                        format!("round {}: upset penalty", number),
                        Some(number),
                        -adj,
                    );
                }
            }
        }
    }

    let total_rounds = rounds.len() as i32;
    let mut all_ids: Vec<String> = tallies.keys().cloned().collect();
    all_ids.sort();

    let ultimate_winner_id = all_ids
        .iter()
        .find(|id| total_rounds > 0 && tallies[*id].wins == total_rounds)
        .cloned();
    let ultimate_loser_id = all_ids
        .iter()
        .find(|id| total_rounds > 0 && tallies[*id].loses == total_rounds)
        .cloned();

    // The two ultimate passes sweep every participant independently. A
    // bystander can be hit by both when both roles exist.
    if let Some(winner_id) = &ultimate_winner_id {
        for id in &all_ids {
            let t = tally(&mut tallies, id);
            if id == winner_id {
                t.add_xp("match: ultimate winner".to_string(), None, ULTIMATE_WIN_XP);
                t.add_elo("match: ultimate winner".to_string(), None, ULTIMATE_WIN_ELO);
            } else {
                t.add_elo(
                    "match: ultimate winner penalty".to_string(),
                    None,
                    ULTIMATE_WIN_OTHERS_ELO,
                );
            }
        }
    }
    if let Some(loser_id) = &ultimate_loser_id {
        for id in &all_ids {
            let t = tally(&mut tallies, id);
            if id == loser_id {
                t.add_elo("match: ultimate loser".to_string(), None, ULTIMATE_LOSS_ELO);
            } else {
                t.add_elo(
                    "match: ultimate loser bonus".to_string(),
                    None,
                    ULTIMATE_LOSS_OTHERS_ELO,
                );
            }
        }
    }

    let mut per_player = HashMap::new();
    for (id, mut t) in tallies {
        let old_elo = *elo_by_id.get(id.as_str()).unwrap_or(&DEFAULT_ELO);
        let mut new_elo = old_elo + t.elo_delta;
        if new_elo < 0 {
            // Keep the ledger consistent with the floored total.
            t.elo_entries.push(BreakdownEntry {
                reason: "rating floor".to_string(),
                round: None,
                delta: -new_elo,
            });
            new_elo = 0;
        }
        let mut xp_gained = t.xp;
        if xp_gained < 0 {
            t.xp_entries.push(BreakdownEntry {
                reason: "xp floor".to_string(),
                round: None,
                delta: -xp_gained,
            });
            xp_gained = 0;
        }

        per_player.insert(
            id,
            PlayerSettlement {
                record: SettlementRecord {
                    wins_added: t.wins,
                    loses_added: t.loses,
                    games_added: t.games,
                    xp_gained,
                    new_elo,
                    perfect_wins: t.perfect_wins,
                },
                elo_breakdown: PlayerBreakdown {
                    total: new_elo - old_elo,
                    breakdown: t.elo_entries,
                },
                xp_breakdown: PlayerBreakdown {
                    total: xp_gained,
                    breakdown: t.xp_entries,
                },
            },
        );
    }

    SettlementOutcome {
        per_player,
        ultimate_winner_id,
        ultimate_loser_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_player(id: &str, elo: i32) -> RosterPlayer {
        RosterPlayer {
            id: id.to_string(),
            username: id.to_string(),
            elo,
            wins: 0,
            loses: 0,
        }
    }

    fn even_roster() -> Vec<RosterPlayer> {
        ["a", "b", "c", "d"]
            .iter()
            .map(|id| roster_player(id, 500))
            .collect()
    }

    fn round(team_a: [&str; 2], team_b: [&str; 2], score_a: i32, score_b: i32) -> RoundPairing {
        let mut pairing = RoundPairing::new(
            [team_a[0].to_string(), team_a[1].to_string()],
            [team_b[0].to_string(), team_b[1].to_string()],
        );
        pairing.score_a = score_a;
        pairing.score_b = score_b;
        pairing
    }

    fn breakdown_sum(breakdown: &PlayerBreakdown) -> i32 {
        breakdown.breakdown.iter().map(|e| e.delta).sum()
    }

    fn assert_ledgers_consistent(roster: &[RosterPlayer], outcome: &SettlementOutcome) {
        for player in roster {
            let settlement = &outcome.per_player[&player.id];
            assert_eq!(
                breakdown_sum(&settlement.elo_breakdown),
                settlement.record.new_elo - player.elo,
                "elo ledger of {} does not sum to its total",
                player.id
            );
            assert_eq!(
                settlement.elo_breakdown.total,
                settlement.record.new_elo - player.elo
            );
            assert_eq!(
                breakdown_sum(&settlement.xp_breakdown),
                settlement.record.xp_gained,
                "xp ledger of {} does not sum to its total",
                player.id
            );
            assert_eq!(settlement.xp_breakdown.total, settlement.record.xp_gained);
        }
    }

    #[test]
    fn tie_round_changes_nothing_but_games_played() {
        let roster = even_roster();
        let rounds = vec![round(["a", "b"], ["c", "d"], 7, 7)];

        let outcome = settle(&roster, &rounds);

        for player in &roster {
            let record = &outcome.per_player[&player.id].record;
            assert_eq!(record.wins_added, 0);
            assert_eq!(record.loses_added, 0);
            assert_eq!(record.games_added, 1);
            assert_eq!(record.xp_gained, 0);
            assert_eq!(record.new_elo, player.elo);
            assert_eq!(record.perfect_wins, 0);
        }
        assert!(outcome.ultimate_winner_id.is_none());
        assert!(outcome.ultimate_loser_id.is_none());
        assert_ledgers_consistent(&roster, &outcome);
    }

    #[test]
    fn flat_elo_component_sums_to_zero_across_a_decisive_round() {
        // Unequal teams so a strength adjustment is in play too. The flat
        // +-20 nets to zero across the four players, and the adjustment is a
        // symmetric transfer, so the whole round conserves elo.
        let roster = vec![
            roster_player("a", 700),
            roster_player("b", 650),
            roster_player("c", 500),
            roster_player("d", 450),
        ];
        let rounds = vec![round(["a", "b"], ["c", "d"], 8, 4)];

        let outcome = settle(&roster, &rounds);

        let total_delta: i32 = roster
            .iter()
            .map(|p| outcome.per_player[&p.id].record.new_elo - p.elo)
            .sum();
        assert_eq!(total_delta, 0);

        // avg(700,650)=675, avg(500,450)=475 -> diff 200 -> adj capped at 10
        let a = &outcome.per_player["a"].record;
        assert_eq!(a.new_elo, 700 + WIN_ELO - STRENGTH_ADJ_CAP);
        let d = &outcome.per_player["d"].record;
        assert_eq!(d.new_elo, 450 - WIN_ELO + STRENGTH_ADJ_CAP);
        assert_ledgers_consistent(&roster, &outcome);
    }

    #[test]
    fn strength_adjustment_scales_with_average_gap() {
        // avg(560,540)=550, avg(500,500)=500 -> diff 50 -> adj 2
        let roster = vec![
            roster_player("a", 560),
            roster_player("b", 540),
            roster_player("c", 500),
            roster_player("d", 500),
        ];
        let rounds = vec![round(["a", "b"], ["c", "d"], 6, 3)];

        let outcome = settle(&roster, &rounds);

        assert_eq!(outcome.per_player["a"].record.new_elo, 560 + 20 - 2);
        assert_eq!(outcome.per_player["c"].record.new_elo, 500 - 20 + 2);
        assert_ledgers_consistent(&roster, &outcome);
    }

    #[test]
    fn underdog_win_flips_the_adjustment_sign() {
        // Winners are the weaker team: they gain the adjustment on top of
        // the flat win bonus, losers pay it.
        let roster = vec![
            roster_player("a", 450),
            roster_player("b", 450),
            roster_player("c", 600),
            roster_player("d", 600),
        ];
        let rounds = vec![round(["a", "b"], ["c", "d"], 9, 5)];

        let outcome = settle(&roster, &rounds);

        // diff 150 -> adj 6
        assert_eq!(outcome.per_player["a"].record.new_elo, 450 + 20 + 6);
        assert_eq!(outcome.per_player["c"].record.new_elo, 600 - 20 - 6);

        let a_ledger = &outcome.per_player["a"].elo_breakdown.breakdown;
        assert!(a_ledger.iter().any(|e| e.reason.contains("underdog bonus") && e.delta == 6));
        assert_ledgers_consistent(&roster, &outcome);
    }

    #[test]
    fn perfect_win_grants_bonus_xp() {
        let roster = even_roster();
        let rounds = vec![round(["a", "b"], ["c", "d"], 0, 10)];

        let outcome = settle(&roster, &rounds);

        // Team b won 10-0: standard 15 xp plus the 50 xp perfect bonus.
        let c = &outcome.per_player["c"].record;
        assert_eq!(c.xp_gained, WIN_XP + PERFECT_WIN_XP);
        assert_eq!(c.perfect_wins, 1);

        let a = &outcome.per_player["a"].record;
        assert_eq!(a.xp_gained, LOSS_XP);
        assert_eq!(a.perfect_wins, 0);
        assert_ledgers_consistent(&roster, &outcome);
    }

    #[test]
    fn ten_to_nonzero_is_not_a_perfect_win() {
        let roster = even_roster();
        let rounds = vec![round(["a", "b"], ["c", "d"], 10, 1)];

        let outcome = settle(&roster, &rounds);

        let a = &outcome.per_player["a"].record;
        assert_eq!(a.xp_gained, WIN_XP);
        assert_eq!(a.perfect_wins, 0);
    }

    #[test]
    fn ultimate_winner_bonus_and_penalty_for_everyone_else() {
        let roster = even_roster();
        // "a" is on the winning side of all three pairings.
        let rounds = vec![
            round(["a", "b"], ["c", "d"], 10, 4),
            round(["a", "c"], ["b", "d"], 10, 6),
            round(["a", "d"], ["b", "c"], 10, 8),
        ];

        let outcome = settle(&roster, &rounds);

        assert_eq!(outcome.ultimate_winner_id.as_deref(), Some("a"));
        assert!(outcome.ultimate_loser_id.is_none());

        let a = &outcome.per_player["a"];
        assert_eq!(a.record.wins_added, 3);
        // 3 wins * 15 xp + 25 ultimate bonus
        assert_eq!(a.record.xp_gained, 3 * WIN_XP + ULTIMATE_WIN_XP);
        // 3 wins * 20 elo + 6 ultimate bonus
        assert_eq!(a.record.new_elo, 500 + 3 * WIN_ELO + ULTIMATE_WIN_ELO);
        assert!(a
            .xp_breakdown
            .breakdown
            .iter()
            .any(|e| e.reason == "match: ultimate winner"
                && e.round.is_none()
                && e.delta == ULTIMATE_WIN_XP));

        for id in ["b", "c", "d"] {
            let other = &outcome.per_player[id];
            assert!(
                other
                    .elo_breakdown
                    .breakdown
                    .iter()
                    .any(|e| e.reason == "match: ultimate winner penalty"
                        && e.round.is_none()
                        && e.delta == ULTIMATE_WIN_OTHERS_ELO),
                "{} is missing the -2 ultimate winner penalty entry",
                id
            );
        }
        assert_ledgers_consistent(&roster, &outcome);
    }

    #[test]
    fn both_ultimate_passes_compound_on_bystanders() {
        let roster = even_roster();
        // "a" wins every round and "d" loses every round. The fixed rotation
        // would make them teammates once, so this uses a repeated pairing;
        // the engine settles whatever pairings it is handed.
        let rounds = vec![
            round(["a", "b"], ["c", "d"], 10, 4),
            round(["a", "c"], ["b", "d"], 10, 6),
            round(["a", "b"], ["c", "d"], 10, 8),
        ];

        let outcome = settle(&roster, &rounds);

        assert_eq!(outcome.ultimate_winner_id.as_deref(), Some("a"));
        assert_eq!(outcome.ultimate_loser_id.as_deref(), Some("d"));

        let b = &outcome.per_player["b"];
        let penalties: Vec<i32> = b
            .elo_breakdown
            .breakdown
            .iter()
            .filter(|e| e.round.is_none())
            .map(|e| e.delta)
            .collect();
        assert_eq!(penalties, vec![ULTIMATE_WIN_OTHERS_ELO, ULTIMATE_LOSS_OTHERS_ELO]);

        // The ultimate winner still receives the +1 from the loser pass, and
        // the ultimate loser still pays the -2 from the winner pass.
        let a = &outcome.per_player["a"];
        assert!(a
            .elo_breakdown
            .breakdown
            .iter()
            .any(|e| e.reason == "match: ultimate loser bonus" && e.delta == 1));
        let d = &outcome.per_player["d"];
        assert!(d
            .elo_breakdown
            .breakdown
            .iter()
            .any(|e| e.reason == "match: ultimate winner penalty" && e.delta == -2));
        assert_ledgers_consistent(&roster, &outcome);
    }

    #[test]
    fn no_ultimate_roles_when_a_round_ties() {
        let roster = even_roster();
        let rounds = vec![
            round(["a", "b"], ["c", "d"], 10, 4),
            round(["a", "c"], ["b", "d"], 10, 6),
            round(["a", "d"], ["b", "c"], 5, 5),
        ];

        let outcome = settle(&roster, &rounds);

        // "a" won both decisive rounds but not all three played.
        assert!(outcome.ultimate_winner_id.is_none());
        assert!(outcome.ultimate_loser_id.is_none());
    }

    #[test]
    fn empty_round_list_settles_to_no_changes() {
        let roster = even_roster();
        let outcome = settle(&roster, &[]);

        assert!(outcome.ultimate_winner_id.is_none());
        assert!(outcome.ultimate_loser_id.is_none());
        for player in &roster {
            let record = &outcome.per_player[&player.id].record;
            assert_eq!(record.games_added, 0);
            assert_eq!(record.new_elo, player.elo);
            assert_eq!(record.xp_gained, 0);
        }
    }

    #[test]
    fn elo_is_floored_at_zero_with_a_ledger_entry() {
        let roster = vec![
            roster_player("a", 500),
            roster_player("b", 500),
            roster_player("c", 500),
            roster_player("d", 10),
        ];
        // "d" starts near the bottom and loses every round, which drives the
        // raw total below zero: each loss costs 20 - 9 compensation = 11,
        // plus the ultimate loser penalty.
        let rounds = vec![
            round(["a", "b"], ["c", "d"], 10, 0),
            round(["a", "c"], ["b", "d"], 10, 0),
            round(["a", "d"], ["b", "c"], 0, 10),
        ];

        let outcome = settle(&roster, &rounds);
        assert_eq!(outcome.ultimate_loser_id.as_deref(), Some("d"));

        let settlement = &outcome.per_player["d"];
        assert_eq!(settlement.record.new_elo, 0);
        // 10 - 3*11 - 3 = -26, floored with a +26 ledger entry.
        assert!(settlement
            .elo_breakdown
            .breakdown
            .iter()
            .any(|e| e.reason == "rating floor" && e.delta == 26));
        assert_ledgers_consistent(&roster, &outcome);
    }

    // Concrete end-to-end fixture: four players at 500 elo, rounds 10-0,
    // 10-3, 6-10 over the fixed pairing rotation.
    #[test]
    fn all_even_three_round_fixture() {
        let roster = even_roster();
        let rounds = vec![
            round(["a", "b"], ["c", "d"], 10, 0),
            round(["a", "c"], ["b", "d"], 10, 3),
            round(["a", "d"], ["b", "c"], 6, 10),
        ];

        let outcome = settle(&roster, &rounds);

        // Nobody won all three rounds; "d" lost all three.
        assert!(outcome.ultimate_winner_id.is_none());
        assert_eq!(outcome.ultimate_loser_id.as_deref(), Some("d"));

        let a = &outcome.per_player["a"].record;
        assert_eq!(
            (a.wins_added, a.loses_added, a.games_added),
            (2, 1, 3)
        );
        assert_eq!(a.xp_gained, 85); // 15+50 + 15 + 5
        assert_eq!(a.new_elo, 521); // 500 +20 +20 -20 +1
        assert_eq!(a.perfect_wins, 1);

        let b = &outcome.per_player["b"].record;
        assert_eq!(
            (b.wins_added, b.loses_added, b.games_added),
            (2, 1, 3)
        );
        assert_eq!(b.xp_gained, 85);
        assert_eq!(b.new_elo, 521);
        assert_eq!(b.perfect_wins, 1);

        let c = &outcome.per_player["c"].record;
        assert_eq!(
            (c.wins_added, c.loses_added, c.games_added),
            (2, 1, 3)
        );
        assert_eq!(c.xp_gained, 35); // 5 + 15 + 15
        assert_eq!(c.new_elo, 521);
        assert_eq!(c.perfect_wins, 0);

        let d = &outcome.per_player["d"].record;
        assert_eq!(
            (d.wins_added, d.loses_added, d.games_added),
            (0, 3, 3)
        );
        assert_eq!(d.xp_gained, 15); // 5 per loss
        assert_eq!(d.new_elo, 437); // 500 -60 -3
        assert_eq!(d.perfect_wins, 0);

        assert_ledgers_consistent(&roster, &outcome);
    }

    #[test]
    fn missing_roster_entry_defaults_to_500() {
        // A pairing can reference an id the roster no longer carries; it is
        // rated at the default and still settled.
        let roster = vec![
            roster_player("a", 500),
            roster_player("b", 500),
            roster_player("c", 500),
        ];
        let rounds = vec![round(["a", "b"], ["c", "ghost"], 10, 2)];

        let outcome = settle(&roster, &rounds);

        let ghost = &outcome.per_player["ghost"].record;
        assert_eq!(ghost.loses_added, 1);
        assert_eq!(ghost.new_elo, 500 - WIN_ELO);
    }
}
