use rand::Rng;

use super::enemy::{Enemy, Slot};
use crate::config::{
    ENEMY_COLUMN_PITCH, ENEMY_COLUMNS, ENEMY_HEIGHT, ENEMY_LEFT_X, ENEMY_MOVE_DOWN,
    ENEMY_ROW_PITCH, ENEMY_ROWS, FEW_ENEMIES, FORMATION_BASE_MOVES, FORMATION_BIAS_STEP,
    FORMATION_FIRST_RUN_OFFSET, FORMATION_VELOCITY, STEP_INTERVAL_FEW, STEP_INTERVAL_FULL,
    STEP_INTERVAL_LAST,
};

/// What a call to [`Formation::advance`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Idle,
    Shift,
    Drop,
}

/// The invader grid, moving as one body.
///
/// Cells are addressed by [`Slot`]; destroying a member clears its cell.
/// The group sweeps sideways one step per `step_interval`, drops a row at
/// the end of each run and reverses. Each side keeps a bias that lengthens
/// its runs once boundary columns are wiped out, so a formation with
/// missing flanks swings further toward the open side.
#[derive(Debug, Clone)]
pub struct Formation {
    columns: usize,
    rows: usize,
    cells: Vec<Option<Enemy>>,
    population: usize,
    /// +1 heading right, -1 heading left
    direction: i32,
    moves_taken: u32,
    left_moves: u32,
    right_moves: u32,
    left_bias: u32,
    right_bias: u32,
    step_interval: u64,
    last_step: u64,
    bottom: i32,
    /// Columns with at least one living member, ascending
    occupied_columns: Vec<usize>,
    left_column: usize,
    right_column: usize,
}

impl Formation {
    /// Full-size grid with its top row at `start_y`
    pub fn standard(start_y: i32, now: u64) -> Self {
        Self::new(ENEMY_COLUMNS, ENEMY_ROWS, start_y, now)
    }

    pub fn new(columns: usize, rows: usize, start_y: i32, now: u64) -> Self {
        let mut cells = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for column in 0..columns {
                cells.push(Some(Enemy::new(
                    Slot::new(row, column),
                    ENEMY_LEFT_X + column as i32 * ENEMY_COLUMN_PITCH,
                    start_y + row as i32 * ENEMY_ROW_PITCH,
                )));
            }
        }

        let population = columns * rows;
        let mut formation = Self {
            columns,
            rows,
            cells,
            population,
            direction: 1,
            moves_taken: FORMATION_FIRST_RUN_OFFSET,
            left_moves: FORMATION_BASE_MOVES,
            right_moves: FORMATION_BASE_MOVES,
            left_bias: 0,
            right_bias: 0,
            step_interval: STEP_INTERVAL_FULL,
            last_step: now,
            bottom: start_y + rows.saturating_sub(1) as i32 * ENEMY_ROW_PITCH + ENEMY_HEIGHT,
            occupied_columns: if population > 0 {
                (0..columns).collect()
            } else {
                Vec::new()
            },
            left_column: 0,
            right_column: columns.saturating_sub(1),
        };
        formation.update_speed();
        formation
    }

    /// Moves the group if a full step interval has passed since the last step
    pub fn advance(&mut self, now: u64) -> Step {
        if self.population == 0 || now.saturating_sub(self.last_step) <= self.step_interval {
            return Step::Idle;
        }

        let run_limit = if self.direction == 1 {
            self.right_moves + self.right_bias
        } else {
            self.left_moves + self.left_bias
        };

        let step = if self.moves_taken >= run_limit {
            self.left_moves = FORMATION_BASE_MOVES + self.right_bias;
            self.right_moves = FORMATION_BASE_MOVES + self.left_bias;
            self.direction = -self.direction;
            self.moves_taken = 0;

            let mut bottom = i32::MIN;
            for enemy in self.cells.iter_mut().flatten() {
                enemy.rect.translate(0, ENEMY_MOVE_DOWN);
                enemy.toggle_frame();
                bottom = bottom.max(enemy.rect.bottom());
            }
            self.bottom = bottom;
            Step::Drop
        } else {
            let dx = FORMATION_VELOCITY * self.direction;
            for enemy in self.cells.iter_mut().flatten() {
                enemy.rect.translate(dx, 0);
                enemy.toggle_frame();
            }
            self.moves_taken += 1;
            Step::Shift
        };

        self.last_step += self.step_interval;
        step
    }

    /// Clears the slot and returns its occupant, if there was one.
    ///
    /// When the cleared column was a boundary column and is now empty, the
    /// boundary walks inward past every empty column, adding one bias step
    /// to that side for each column crossed.
    pub fn remove(&mut self, slot: Slot) -> Option<Enemy> {
        let index = self.index(slot)?;
        let enemy = self.cells[index].take()?;
        self.population -= 1;

        let column = slot.column;
        let mut column_empty = self.is_column_empty(column);
        if column_empty {
            self.occupied_columns.retain(|&c| c != column);
        }

        if column == self.right_column {
            while column_empty && self.right_column > self.left_column {
                self.right_column -= 1;
                self.right_bias += FORMATION_BIAS_STEP;
                column_empty = self.is_column_empty(self.right_column);
            }
        } else if column == self.left_column {
            while column_empty && self.left_column < self.right_column {
                self.left_column += 1;
                self.left_bias += FORMATION_BIAS_STEP;
                column_empty = self.is_column_empty(self.left_column);
            }
        }

        debug_assert!(
            self.population == 0
                || (!self.is_column_empty(self.left_column)
                    && !self.is_column_empty(self.right_column)),
            "formation boundary points at an empty column"
        );

        self.update_speed();
        Some(enemy)
    }

    /// Picks a random occupied column and returns its lowest living member
    pub fn pick_shooter<R: Rng>(&self, rng: &mut R) -> Option<&Enemy> {
        if self.occupied_columns.is_empty() {
            return None;
        }
        let column = self.occupied_columns[rng.random_range(0..self.occupied_columns.len())];
        (0..self.rows)
            .rev()
            .find_map(|row| self.get(Slot::new(row, column)))
    }

    pub fn get(&self, slot: Slot) -> Option<&Enemy> {
        self.index(slot).and_then(|i| self.cells[i].as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.cells.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.population
    }

    pub fn is_empty(&self) -> bool {
        self.population == 0
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn moves_taken(&self) -> u32 {
        self.moves_taken
    }

    /// Lowest edge of the group, refreshed on every drop
    pub fn bottom(&self) -> i32 {
        self.bottom
    }

    pub fn left_bias(&self) -> u32 {
        self.left_bias
    }

    pub fn right_bias(&self) -> u32 {
        self.right_bias
    }

    pub fn step_interval(&self) -> u64 {
        self.step_interval
    }

    /// Left-most and right-most occupied columns
    pub fn boundary_columns(&self) -> Option<(usize, usize)> {
        (!self.is_empty()).then_some((self.left_column, self.right_column))
    }

    pub fn occupied_columns(&self) -> &[usize] {
        &self.occupied_columns
    }

    fn index(&self, slot: Slot) -> Option<usize> {
        (slot.row < self.rows && slot.column < self.columns)
            .then_some(slot.row * self.columns + slot.column)
    }

    fn is_column_empty(&self, column: usize) -> bool {
        (0..self.rows).all(|row| self.get(Slot::new(row, column)).is_none())
    }

    // Speeds up as the swarm thins out; the interval never grows back.
    fn update_speed(&mut self) {
        self.step_interval = match self.population {
            0 => self.step_interval,
            1 => STEP_INTERVAL_LAST,
            n if n <= FEW_ENEMIES => STEP_INTERVAL_FEW.min(self.step_interval),
            _ => STEP_INTERVAL_FULL.min(self.step_interval),
        };
    }
}
