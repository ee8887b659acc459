//! Output formatting utilities for CLI.

use hexrealm::game::Standing;
use hexrealm::render::{render_map, render_standings};
use hexrealm::{ConquestOutcome, PlayerId, Session};
use serde::Serialize;

/// JSON-serializable session result.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunResult {
    /// Random seed used.
    pub(super) seed: u64,
    /// Rounds played.
    pub(super) rounds: u32,
    /// Grid size.
    pub(super) cols: u16,
    /// Grid size.
    pub(super) rows: u16,
    /// Land tiles.
    pub(super) land: usize,
    /// Player with the most territory.
    pub(super) leader: Option<PlayerId>,
    /// Final standings.
    pub(super) players: Vec<Standing>,
    /// Conquest attempts of the last round.
    pub(super) last_conquests: Vec<ConquestOutcome>,
}

impl JsonRunResult {
    /// Snapshot a finished session.
    pub(super) fn from_session(session: &Session, seed: u64, last_conquests: Vec<ConquestOutcome>) -> Self {
        let grid = session.grid();
        Self {
            seed,
            rounds: session.round(),
            cols: grid.cols(),
            rows: grid.rows(),
            land: grid.land().len(),
            leader: session.leader(),
            players: session.standings(),
            last_conquests,
        }
    }
}

/// Format a finished session as human-readable text.
pub(super) fn format_text(session: &Session, seed: u64) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Game Result (seed: {seed}, {} rounds)\n\n",
        session.round()
    ));
    output.push_str(&render_map(session.grid()));
    output.push('\n');
    output.push_str(&render_standings(&session.standings()));
    if let Some(leader) = session.leader().and_then(|id| session.grid().player(id)) {
        output.push_str(&format!(
            "\nLeader: {} with {} tiles\n",
            leader.name,
            leader.owned_tiles().len()
        ));
    }

    output
}

/// Batch statistics aggregated across games.
#[derive(Debug, Default)]
pub(super) struct BatchStats {
    /// Total games played.
    pub(super) games_played: u64,
    /// Games that failed to set up or play.
    pub(super) failures: u64,
    /// Win count per player (most territory at the end).
    pub(super) wins: Vec<u64>,
    /// Games where several players tied for the most territory.
    pub(super) ties: u64,
    /// Total final territory per player.
    total_territory: Vec<f64>,
    /// Territory sum of squares for std dev calculation.
    territory_sq_sums: Vec<f64>,
    /// Total land share owned at the end, summed across games.
    total_claimed_share: f64,
}

impl BatchStats {
    /// Create new stats for n players.
    pub(super) fn new(num_players: usize) -> Self {
        Self {
            wins: vec![0; num_players],
            total_territory: vec![0.0; num_players],
            territory_sq_sums: vec![0.0; num_players],
            ..Self::default()
        }
    }

    /// Add a finished session to the stats.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn add_session(&mut self, session: &Session) {
        self.games_played += 1;

        let territory: Vec<usize> = session
            .grid()
            .players()
            .iter()
            .map(|p| p.owned_tiles().len())
            .collect();
        let most = territory.iter().copied().max().unwrap_or(0);
        let leaders: Vec<usize> = (0..territory.len()).filter(|&i| territory[i] == most).collect();
        match leaders.as_slice() {
            [winner] if *winner < self.wins.len() => self.wins[*winner] += 1,
            _ => self.ties += 1,
        }

        for (i, &tiles) in territory.iter().enumerate() {
            if i < self.total_territory.len() {
                let tiles = tiles as f64;
                self.total_territory[i] += tiles;
                self.territory_sq_sums[i] += tiles * tiles;
            }
        }

        let land = session.grid().land().len();
        if land > 0 {
            self.total_claimed_share += territory.iter().sum::<usize>() as f64 / land as f64;
        }
    }

    /// Record a game that could not be played.
    pub(super) fn add_failure(&mut self) {
        self.failures += 1;
    }

    /// Merge another thread's stats into this one.
    pub(super) fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.failures += other.failures;
        self.ties += other.ties;
        self.total_claimed_share += other.total_claimed_share;
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        for (a, b) in self.total_territory.iter_mut().zip(&other.total_territory) {
            *a += b;
        }
        for (a, b) in self.territory_sq_sums.iter_mut().zip(&other.territory_sq_sums) {
            *a += b;
        }
    }

    /// Get win rate for a player (0.0-1.0).
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn win_rate(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins.get(player_idx).copied().unwrap_or(0) as f64 / self.games_played as f64
    }

    /// Get average final territory for a player.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_territory(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_territory.get(player_idx).copied().unwrap_or(0.0) / self.games_played as f64
    }

    /// Get territory standard deviation for a player.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn territory_std_dev(&self, player_idx: usize) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        let n = self.games_played as f64;
        let mean = self.avg_territory(player_idx);
        let sq_sum = self.territory_sq_sums.get(player_idx).copied().unwrap_or(0.0);
        let variance = (sq_sum / n) - (mean * mean);
        if variance < 0.0 { 0.0 } else { variance.sqrt() }
    }

    /// Average fraction of land owned by someone at the end of a game.
    #[allow(clippy::cast_precision_loss)]
    pub(super) fn avg_claimed_share(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_claimed_share / self.games_played as f64
    }
}

/// JSON-serializable batch result.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchResult {
    /// Total games played.
    games_played: u64,
    /// Games that failed.
    failures: u64,
    /// Per-player statistics.
    players: Vec<JsonBatchPlayer>,
    /// Games without a single territory leader.
    ties: u64,
    /// Average owned share of land at the end.
    avg_claimed_share: f64,
}

/// JSON-serializable per-player batch stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonBatchPlayer {
    /// Player number (1-based).
    player: usize,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average territory.
    avg_territory: f64,
    /// Territory standard deviation.
    territory_std_dev: f64,
}

impl JsonBatchResult {
    /// Create from stats.
    pub(super) fn from_stats(stats: &BatchStats) -> Self {
        let players = (0..stats.wins.len())
            .map(|i| JsonBatchPlayer {
                player: i + 1,
                wins: stats.wins[i],
                win_rate: stats.win_rate(i),
                avg_territory: stats.avg_territory(i),
                territory_std_dev: stats.territory_std_dev(i),
            })
            .collect();

        Self {
            games_played: stats.games_played,
            failures: stats.failures,
            players,
            ties: stats.ties,
            avg_claimed_share: stats.avg_claimed_share(),
        }
    }
}

/// Format batch stats as human-readable text.
#[allow(clippy::cast_precision_loss)]
pub(super) fn format_batch_text(stats: &BatchStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("Batch Results ({} games)\n", stats.games_played));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates (most territory):\n");
    for (i, wins) in stats.wins.iter().enumerate() {
        let rate = stats.win_rate(i) * 100.0;
        output.push_str(&format!("  Player {}: {rate:.1}% ({wins} wins)\n", i + 1));
    }
    let tie_rate = if stats.games_played == 0 {
        0.0
    } else {
        stats.ties as f64 / stats.games_played as f64 * 100.0
    };
    output.push_str(&format!("  Ties: {} ({tie_rate:.1}%)\n\n", stats.ties));

    output.push_str("Average Territory:\n");
    for i in 0..stats.wins.len() {
        output.push_str(&format!(
            "  Player {}: {:.1} (+/- {:.1})\n",
            i + 1,
            stats.avg_territory(i),
            stats.territory_std_dev(i)
        ));
    }

    output.push_str(&format!(
        "\nAverage land claimed: {:.1}%\n",
        stats.avg_claimed_share() * 100.0
    ));
    if stats.failures > 0 {
        output.push_str(&format!("Failed games: {}\n", stats.failures));
    }

    output
}

/// Format batch stats as CSV.
pub(super) fn format_batch_csv(stats: &BatchStats) -> String {
    let mut output = String::new();

    output.push_str("player,wins,win_rate,avg_territory,territory_std_dev\n");

    for (i, wins) in stats.wins.iter().enumerate() {
        output.push_str(&format!(
            "{},{},{:.4},{:.2},{:.2}\n",
            i + 1,
            wins,
            stats.win_rate(i),
            stats.avg_territory(i),
            stats.territory_std_dev(i)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexrealm::GameConfig;

    fn finished(seed: u64) -> Session {
        let config = GameConfig {
            cols: 10,
            rows: 8,
            ..GameConfig::default()
        };
        let mut session = Session::new(&config, seed).unwrap();
        session.play_rounds(5).unwrap();
        session
    }

    #[test]
    fn test_stats_merge() {
        let mut a = BatchStats::new(2);
        a.add_session(&finished(1));
        let mut b = BatchStats::new(2);
        b.add_session(&finished(2));
        b.add_failure();
        a.merge(&b);
        assert_eq!(a.games_played, 2);
        assert_eq!(a.failures, 1);
        assert_eq!(a.wins.iter().sum::<u64>() + a.ties, 2);
    }

    #[test]
    fn test_csv_rows() {
        let mut stats = BatchStats::new(2);
        stats.add_session(&finished(3));
        let csv = format_batch_csv(&stats);
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.starts_with("player,wins"));
    }

    #[test]
    fn test_text_and_json() {
        let session = finished(4);
        let text = format_text(&session, 4);
        assert!(text.contains("seed: 4"));
        let json = serde_json::to_string(&JsonRunResult::from_session(&session, 4, Vec::new())).unwrap();
        assert!(json.contains("\"rounds\":5"));
    }
}
