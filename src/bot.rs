//! Per-tick decision loop and the tactical policies layered on the routing
//! core.
//!
//! Units are processed strictly in roster order: the claim ledger's
//! exclusivity depends on sequential commits, and the tick budget is checked
//! between units so an overrunning tick returns whatever commands exist so
//! far.

use crate::budget::TickBudget;
use crate::claims::ClaimLedger;
use crate::commands::{CommandAction, CommandType};
use crate::constants::{
    ATTACK_RADIUS, DANGER_RADIUS, MAX_SPAWN_CANDIDATES, NEIGHBORS_4, SUMMON_CUTOFF_TICKS,
    SUMMON_SAFETY_MARGIN,
};
use crate::game::{Diamond, GameTick, Team, TileType, Unit};
use crate::grid::GridMap;
use crate::objective::Objective;
use crate::position::Position;
use crate::router;
use crate::spawn::{self, TieBreak};
use fnv::FnvHashSet;
use log::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;

/// The bot. Holds no game state across ticks; the grid, rosters, and claim
/// ledger are rebuilt from each snapshot.
pub struct Bot {
    rng: StdRng,
    max_spawn_candidates: usize,
    spawn_tie_break: TieBreak,
}

impl Bot {
    pub fn new() -> Bot {
        Bot {
            rng: StdRng::from_entropy(),
            max_spawn_candidates: MAX_SPAWN_CANDIDATES,
            spawn_tie_break: TieBreak::LastMin,
        }
    }

    /// Deterministic variant for tests and replays.
    pub fn with_seed(seed: u64) -> Bot {
        Bot {
            rng: StdRng::seed_from_u64(seed),
            ..Bot::new()
        }
    }

    /// Produce one command per controlled unit, in roster order. Stops early
    /// and returns the commands decided so far when the budget runs out.
    pub fn act(&mut self, tick: &GameTick, budget: &TickBudget) -> Vec<CommandAction> {
        let Some(team) = tick.my_team() else {
            warn!("tick {}: team {} absent from snapshot", tick.tick, tick.team_id);
            return Vec::new();
        };

        let grid = GridMap::new(&tick.map);
        let view = TickView::new(tick, team);
        let spawn_cells = spawn::spawn_candidates(&grid, self.max_spawn_candidates);

        let mut ledger = ClaimLedger::new();
        ledger.reset(team.units.iter().map(|u| u.id.clone()));

        let mut commands = Vec::with_capacity(team.units.len());
        for unit in &team.units {
            if !budget.has_budget() {
                warn!(
                    "tick {}: budget exhausted after {} of {} units",
                    tick.tick,
                    commands.len(),
                    team.units.len()
                );
                break;
            }
            commands.push(self.decide(unit, tick, &grid, &view, &spawn_cells, &mut ledger));
        }

        debug!("tick {}: issued {} commands", tick.tick, commands.len());
        commands
    }

    fn decide(
        &mut self,
        unit: &Unit,
        tick: &GameTick,
        grid: &GridMap,
        view: &TickView,
        spawn_cells: &[Position],
        ledger: &mut ClaimLedger,
    ) -> CommandAction {
        if !unit.has_spawned {
            self.spawn_command(unit, grid, view, spawn_cells, ledger)
        } else if unit.has_diamond {
            self.holder_command(unit, tick, grid, view)
        } else {
            self.collector_command(unit, grid, view, ledger)
        }
    }

    /// Pick the spawn cell from which the best unclaimed diamond is fastest
    /// to reach. Cells occupied by allies, or by enemies that are still in
    /// spawn territory or hold nothing, are treated as obstacles; those
    /// units have no reason to move out of the way.
    fn spawn_command(
        &mut self,
        unit: &Unit,
        grid: &GridMap,
        view: &TickView,
        spawn_cells: &[Position],
        ledger: &mut ClaimLedger,
    ) -> CommandAction {
        let candidates: Vec<Objective> = view
            .available_diamonds
            .iter()
            .map(|d| Objective::diamond(d))
            .filter(|o| ledger.is_available_for_unit(&unit.id, Some(o.position())))
            .collect();

        let mut blocked: FnvHashSet<Position> =
            view.allies.iter().map(|u| u.position).collect();
        blocked.extend(
            view.enemies
                .iter()
                .filter(|u| {
                    grid.tile_at(u.position) == Some(TileType::Spawn) || !u.has_diamond
                })
                .map(|u| u.position),
        );

        match spawn::optimal_spawn(grid, spawn_cells, &candidates, &blocked, self.spawn_tie_break)
        {
            Some(plan) => {
                ledger.claim_for_unit(&unit.id, &plan.target_path.objective);
                CommandAction::new(CommandType::Spawn, &unit.id, Some(plan.spawn))
            }
            None => match self.random_cell(spawn_cells) {
                Some(cell) => CommandAction::new(CommandType::Spawn, &unit.id, Some(cell)),
                None => CommandAction::none(&unit.id),
            },
        }
    }

    /// A unit carrying a diamond protects its score: finish summons, bank
    /// the diamond before the game ends or an enemy reaches us, otherwise
    /// level it up or keep distance.
    fn holder_command(
        &mut self,
        unit: &Unit,
        tick: &GameTick,
        grid: &GridMap,
        view: &TickView,
    ) -> CommandAction {
        if unit.is_summoning {
            return CommandAction::none(&unit.id);
        }
        if tick.tick + 1 >= tick.total_tick {
            return self.drop_command(unit, grid, view);
        }
        if self.position_is_dangerous(unit, view) {
            return self.drop_command(unit, grid, view);
        }
        if self.summon_is_worthwhile(unit, tick, view) {
            return CommandAction::new(CommandType::Summon, &unit.id, None);
        }
        match self.nearest_enemy(unit, view) {
            None => CommandAction::none(&unit.id),
            Some(enemy) => {
                let destination = self.step_away_from(unit, enemy.position, grid, view);
                CommandAction::new(CommandType::Move, &unit.id, Some(destination))
            }
        }
    }

    /// Chase the nearest unclaimed diamond; attack or cut off an enemy that
    /// gets within reach on the way.
    fn collector_command(
        &mut self,
        unit: &Unit,
        grid: &GridMap,
        view: &TickView,
        ledger: &mut ClaimLedger,
    ) -> CommandAction {
        let candidates: Vec<Objective> = view
            .available_diamonds
            .iter()
            .map(|d| Objective::diamond(d))
            .collect();
        let blocked: FnvHashSet<Position> =
            view.allies.iter().map(|u| u.position).collect();

        let Some(target_path) =
            router::route(grid, unit.position, &unit.id, &candidates, &blocked, ledger)
        else {
            return CommandAction::none(&unit.id);
        };
        self.move_or_engage(unit, target_path.next_step(), grid, view)
    }

    fn move_or_engage(
        &mut self,
        unit: &Unit,
        destination: Option<Position>,
        grid: &GridMap,
        view: &TickView,
    ) -> CommandAction {
        let nearby: Option<&&Unit> = view.enemies.iter().find(|e| {
            grid.tile_at(e.position) == Some(TileType::Empty)
                && unit.position.padded_distance_to(e.position) < ATTACK_RADIUS
        });

        if let Some(enemy) = nearby {
            if grid.tile_at(unit.position) == Some(TileType::Empty) {
                return CommandAction::new(CommandType::Attack, &unit.id, Some(enemy.position));
            }
            // Still inside spawn territory, where attacks are not possible:
            // step to a tile flanking the enemy instead.
            if let Some(flank) = flank_tile(unit, enemy.position, grid) {
                return CommandAction::new(CommandType::Move, &unit.id, Some(flank));
            }
            if let Some(free) = grid.free_adjacent_tile(unit.position, &view.unit_positions) {
                return CommandAction::new(CommandType::Move, &unit.id, Some(free));
            }
        }

        match destination {
            Some(cell) => CommandAction::new(CommandType::Move, &unit.id, Some(cell)),
            None => CommandAction::none(&unit.id),
        }
    }

    fn drop_command(&mut self, unit: &Unit, grid: &GridMap, view: &TickView) -> CommandAction {
        match grid.free_adjacent_tile(unit.position, &view.unit_positions) {
            Some(cell) => CommandAction::new(CommandType::Drop, &unit.id, Some(cell)),
            None => CommandAction::none(&unit.id),
        }
    }

    fn position_is_dangerous(&self, unit: &Unit, view: &TickView) -> bool {
        view.enemies
            .iter()
            .any(|e| unit.position.padded_distance_to(e.position) < DANGER_RADIUS)
    }

    fn summon_is_worthwhile(&self, unit: &Unit, tick: &GameTick, view: &TickView) -> bool {
        if tick.tick + SUMMON_CUTOFF_TICKS >= tick.total_tick {
            return false;
        }
        let Some(diamond) = unit
            .diamond_id
            .as_deref()
            .and_then(|id| tick.map.diamond_by_id(id))
        else {
            return false;
        };
        if diamond.summon_level >= tick.game_config.maximum_diamond_summon_level {
            return false;
        }
        let reach = (diamond.summon_level + SUMMON_SAFETY_MARGIN) as f64;
        view.enemies
            .iter()
            .all(|e| unit.position.distance_to(e.position) > reach)
    }

    fn nearest_enemy<'a>(&self, unit: &Unit, view: &'a TickView) -> Option<&'a Unit> {
        view.enemies
            .iter()
            .min_by(|a, b| {
                unit.position
                    .distance_to(a.position)
                    .partial_cmp(&unit.position.distance_to(b.position))
                    .unwrap_or(Ordering::Equal)
            })
            .copied()
    }

    /// The adjacent EMPTY cell that gains the most distance from `threat`.
    /// Cells under units or loose diamonds are not stepped onto; when no
    /// neighbor improves on standing still, the unit holds its cell.
    fn step_away_from(
        &self,
        unit: &Unit,
        threat: Position,
        grid: &GridMap,
        view: &TickView,
    ) -> Position {
        let mut best = unit.position;
        let mut best_distance = unit.position.distance_to(threat);
        for &(dx, dy) in &NEIGHBORS_4 {
            let cell = unit.position + (dx, dy);
            if grid.tile_at(cell) != Some(TileType::Empty) {
                continue;
            }
            if view.unit_positions.contains(&cell) || view.ground_diamonds.contains(&cell) {
                continue;
            }
            let distance = cell.distance_to(threat);
            if distance > best_distance {
                best = cell;
                best_distance = distance;
            }
        }
        best
    }

    fn random_cell(&mut self, cells: &[Position]) -> Option<Position> {
        if cells.is_empty() {
            return None;
        }
        Some(cells[self.rng.gen_range(0..cells.len())])
    }
}

impl Default for Bot {
    fn default() -> Self {
        Bot::new()
    }
}

/// Rosters derived once per tick from the snapshot.
struct TickView<'a> {
    /// Spawned units on the controlled team.
    allies: Vec<&'a Unit>,
    /// Spawned units on every other team.
    enemies: Vec<&'a Unit>,
    /// Diamonds not held by an ally (loose or enemy-held).
    available_diamonds: Vec<&'a Diamond>,
    /// Cells occupied by any spawned unit.
    unit_positions: FnvHashSet<Position>,
    /// Cells holding a loose diamond.
    ground_diamonds: FnvHashSet<Position>,
}

impl<'a> TickView<'a> {
    fn new(tick: &'a GameTick, team: &'a Team) -> TickView<'a> {
        let allies: Vec<&Unit> = team.units.iter().filter(|u| u.has_spawned).collect();
        let enemies: Vec<&Unit> = tick
            .teams
            .iter()
            .filter(|t| t.id != tick.team_id)
            .flat_map(|t| t.units.iter())
            .filter(|u| u.has_spawned)
            .collect();

        let allied_ids: FnvHashSet<&str> = allies.iter().map(|u| u.id.as_str()).collect();
        let available_diamonds: Vec<&Diamond> = tick
            .map
            .diamonds
            .iter()
            .filter(|d| {
                d.owner_id
                    .as_deref()
                    .map_or(true, |owner| !allied_ids.contains(owner))
            })
            .collect();

        let unit_positions: FnvHashSet<Position> = allies
            .iter()
            .chain(enemies.iter())
            .map(|u| u.position)
            .collect();
        let ground_diamonds: FnvHashSet<Position> = tick
            .map
            .diamonds
            .iter()
            .filter(|d| d.owner_id.is_none())
            .map(|d| d.position)
            .collect();

        TickView {
            allies,
            enemies,
            available_diamonds,
            unit_positions,
            ground_diamonds,
        }
    }
}

fn flank_tile(unit: &Unit, enemy: Position, grid: &GridMap) -> Option<Position> {
    let offsets: [(i16, i16); 2] = if enemy.x != unit.position.x {
        [(1, 0), (-1, 0)]
    } else {
        [(0, 1), (0, -1)]
    };
    offsets
        .iter()
        .map(|&(dx, dy)| enemy + (dx, dy))
        .find(|&cell| grid.tile_at(cell) == Some(TileType::Empty))
}
