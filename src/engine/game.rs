// Game state for one Colonel Blotto instance and the exhaustive solver.
//
// Every ordered distribution of troops across fields is a pure strategy. A strategy
// is scored against each opponent strategy by playing all distinct permutations of
// both sides, so the field order of a distribution does not matter to the score.

use serde::{Serialize, Serializer};

/// Result of a single battle from the player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// Reasons a game cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    #[error("troops must be positive")]
    NoTroops,
    #[error("fields must be positive")]
    NoFields,
    #[error(
        "{troops} troops across {fields} fields gives {combos} combinations, above the limit of {limit}"
    )]
    TooLarge {
        troops: u32,
        fields: u32,
        combos: u64,
        limit: u64,
    },
    #[error(
        "solving {troops} troops across {fields} fields needs about {work} battle evaluations, above the limit of {limit}"
    )]
    TooMuchWork {
        troops: u32,
        fields: u32,
        work: u64,
        limit: u64,
    },
}

/// Size bounds checked before a game is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Most ordered distributions a game may enumerate.
    pub max_combos: u64,
    /// Most battle evaluations a solve may perform, see [`Game::solve_work`].
    pub max_work: u64,
}

impl Limits {
    pub const UNBOUNDED: Limits = Limits {
        max_combos: u64::MAX,
        max_work: u64::MAX,
    };
}

/// Best combination found by [`Game::solve`].
///
/// Serializes as the positional array
/// `[solution_combo, win_prob, draw_prob, lose_prob, min_win_minus_lose_diff]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub solution_combo: Option<Vec<u32>>,
    /// Average win probability across all opponent combinations.
    pub win_prob: f64,
    pub draw_prob: f64,
    pub lose_prob: f64,
    /// Worst-case (win - lose) across all opponent combinations.
    pub min_win_minus_lose_diff: f64,
}

impl Solution {
    /// Whether the combination never does worse than break even on (win - lose).
    pub fn is_dominant(&self) -> bool {
        self.min_win_minus_lose_diff >= 0.0
    }
}

impl Serialize for Solution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (
            &self.solution_combo,
            self.win_prob,
            self.draw_prob,
            self.lose_prob,
            self.min_win_minus_lose_diff,
        )
            .serialize(serializer)
    }
}

/// Binomial coefficient C(n, k), saturating at `u64::MAX`.
///
/// Iterates `min(k, n - k)` times, and stops as soon as the value saturates.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k) as u128;
    let n = n as u128;
    let mut result: u128 = 1;
    for i in 1..=k {
        // result * (n - k + i) / i stays exact: it equals C(n - k + i, i).
        result = match result.checked_mul(n - k + i) {
            Some(v) => v / i,
            None => return u64::MAX,
        };
        if result > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    result as u64
}

/// Number of ordered distributions of `troops` across `fields`: C(troops + fields - 1, fields - 1).
/// Saturates at `u64::MAX`.
pub fn combo_count(troops: u32, fields: u32) -> u64 {
    if fields == 0 {
        return 0;
    }
    binomial(troops as u64 + fields as u64 - 1, fields as u64 - 1)
}

/// Number of distinct orderings of `combo` (a multinomial coefficient), saturating.
pub fn distinct_permutation_count(combo: &[u32]) -> u64 {
    let mut sorted = combo.to_vec();
    sorted.sort_unstable();
    let mut remaining = sorted.len() as u64;
    let mut count: u64 = 1;
    for group in sorted.chunk_by(|a, b| a == b) {
        let size = group.len() as u64;
        count = count.saturating_mul(binomial(remaining, size));
        remaining -= size;
    }
    count
}

/// Compare two allocations field by field. The side holding more fields wins.
pub fn calculate_outcome(player: &[u32], opponent: &[u32]) -> Outcome {
    let mut player_fields = 0;
    let mut opponent_fields = 0;
    for (p, o) in player.iter().zip(opponent) {
        if p > o {
            player_fields += 1;
        } else if o > p {
            opponent_fields += 1;
        }
    }
    if player_fields > opponent_fields {
        Outcome::Win
    } else if opponent_fields > player_fields {
        Outcome::Loss
    } else {
        Outcome::Draw
    }
}

/// All distinct orderings of `combo`, in lexicographic order.
pub fn distinct_permutations(combo: &[u32]) -> Vec<Vec<u32>> {
    let mut current = combo.to_vec();
    current.sort_unstable();
    let mut perms = vec![current.clone()];
    while next_permutation(&mut current) {
        perms.push(current.clone());
    }
    perms
}

fn next_permutation(values: &mut [u32]) -> bool {
    if values.len() < 2 {
        return false;
    }
    let mut i = values.len() - 1;
    while i > 0 && values[i - 1] >= values[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = values.len() - 1;
    while values[j] <= values[i - 1] {
        j -= 1;
    }
    values.swap(i - 1, j);
    values[i..].reverse();
    true
}

/// One Blotto instance: a troop budget, a number of fields, and every way to split one over the other.
#[derive(Debug, Clone)]
pub struct Game {
    pub troops: u32,
    pub fields: u32,
    combos: Vec<Vec<u32>>,
}

impl Game {
    /// Create a game, refusing parameter sets that exceed `limits`.
    ///
    /// The combination count is checked before anything is allocated; the solve
    /// work is checked after enumeration, which the combination cap keeps small.
    pub fn new(troops: u32, fields: u32, limits: Limits) -> Result<Self, SolverError> {
        if troops == 0 {
            return Err(SolverError::NoTroops);
        }
        if fields == 0 {
            return Err(SolverError::NoFields);
        }
        let combos = combo_count(troops, fields);
        if combos > limits.max_combos {
            return Err(SolverError::TooLarge {
                troops,
                fields,
                combos,
                limit: limits.max_combos,
            });
        }

        let mut game = Game {
            troops,
            fields,
            combos: Vec::with_capacity(combos as usize),
        };
        let mut scratch = vec![0; fields as usize];
        game.collect_combos(0, troops, &mut scratch);

        let work = game.solve_work();
        if work > limits.max_work {
            return Err(SolverError::TooMuchWork {
                troops,
                fields,
                work,
                limit: limits.max_work,
            });
        }
        Ok(game)
    }

    /// Battle evaluations [`Game::solve`] performs: (sum of distinct permutations
    /// over all combos)^2 * fields, saturating.
    pub fn solve_work(&self) -> u64 {
        let perms = self
            .combos
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(distinct_permutation_count(c)));
        perms
            .saturating_mul(perms)
            .saturating_mul(self.fields as u64)
    }

    fn collect_combos(&mut self, index: usize, troops: u32, combo: &mut [u32]) {
        if troops == 0 {
            self.combos.push(combo.to_vec());
            return;
        }
        if index == combo.len() - 1 {
            combo[index] += troops;
            self.combos.push(combo.to_vec());
            combo[index] -= troops;
            return;
        }
        for i in 0..=troops {
            combo[index] += i;
            self.collect_combos(index + 1, troops - i, combo);
            combo[index] -= i;
        }
    }

    /// Every ordered distribution, field 0 varying slowest.
    pub fn combos(&self) -> &[Vec<u32>] {
        &self.combos
    }

    /// Find the combination maximizing the worst-case (win - lose) probability margin.
    ///
    /// Ties go to the combination enumerated last. Cost is [`Game::solve_work`], so
    /// callers on an async runtime should run it on a blocking thread.
    pub fn solve(&self) -> Solution {
        let perms: Vec<Vec<Vec<u32>>> = self
            .combos
            .iter()
            .map(|c| distinct_permutations(c))
            .collect();

        let mut best: Option<Solution> = None;

        for (player_index, player_perms) in perms.iter().enumerate() {
            let mut min_diff = f64::INFINITY;
            let (mut win_sum, mut draw_sum, mut lose_sum) = (0.0, 0.0, 0.0);

            for opponent_perms in &perms {
                let (mut wins, mut draws, mut losses) = (0u64, 0u64, 0u64);
                for p in player_perms {
                    for o in opponent_perms {
                        match calculate_outcome(p, o) {
                            Outcome::Win => wins += 1,
                            Outcome::Draw => draws += 1,
                            Outcome::Loss => losses += 1,
                        }
                    }
                }
                let total = (wins + draws + losses) as f64;
                let win = wins as f64 / total;
                let draw = draws as f64 / total;
                let lose = losses as f64 / total;

                min_diff = min_diff.min(win - lose);
                win_sum += win;
                draw_sum += draw;
                lose_sum += lose;
            }

            let better = match &best {
                Some(b) => min_diff >= b.min_win_minus_lose_diff,
                None => true,
            };
            if better {
                let n = perms.len() as f64;
                best = Some(Solution {
                    solution_combo: Some(self.combos[player_index].clone()),
                    win_prob: win_sum / n,
                    draw_prob: draw_sum / n,
                    lose_prob: lose_sum / n,
                    min_win_minus_lose_diff: min_diff,
                });
            }
        }

        best.unwrap_or(Solution {
            solution_combo: None,
            win_prob: 0.0,
            draw_prob: 0.0,
            lose_prob: 0.0,
            min_win_minus_lose_diff: 0.0,
        })
    }
}
