//! Text layouts for the grid world.
//!
//! | Char | Meaning       |
//! |------|---------------|
//! | `%`  | wall          |
//! | `.`  | food          |
//! | `o`  | capsule       |
//! | `P`  | agent start   |
//! | `G`  | ghost start   |
//! | ` `  | empty floor   |
//!
//! The first text row is the top of the grid (largest `y`).

use std::{
    collections::{BTreeSet, HashSet},
    path::Path,
    str::FromStr,
};

use crate::{Error, Result, types::Position};

const TINY: &str = "\
%%%%%
%P .%
%.%.%
%%%%%";

const SMALL: &str = "\
%%%%%%%
%P  . %
% %%% %
%.  o %
% %%% %
%.   G%
%%%%%%%";

const MEDIUM: &str = "\
%%%%%%%%%%
%P   .  o%
% %%%%%% %
% .  G . %
% %%%%%% %
%o  .   .%
%%%%%%%%%%";

/// Names accepted by [`Layout::builtin`].
pub const BUILTIN_LAYOUTS: [&str; 3] = ["tiny", "small", "medium"];

/// Static description of a grid world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    width: i32,
    height: i32,
    walls: HashSet<Position>,
    food: BTreeSet<Position>,
    capsules: BTreeSet<Position>,
    agent_start: Position,
    ghost_starts: Vec<Position>,
}

impl Layout {
    /// Parse a layout from its text form.
    ///
    /// Blank lines before and after the grid are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error for empty input, rows of different widths, unknown
    /// characters, or anything other than exactly one `P`.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .skip_while(|line| line.trim().is_empty())
            .collect();
        let rows: Vec<&str> = match rows.iter().rposition(|line| !line.trim().is_empty()) {
            Some(last) => rows[..=last].to_vec(),
            None => return Err(Error::EmptyLayout),
        };

        let width = rows[0].chars().count();
        let height = rows.len();
        let mut walls = HashSet::new();
        let mut food = BTreeSet::new();
        let mut capsules = BTreeSet::new();
        let mut agent_starts = Vec::new();
        let mut ghost_starts = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let got = line.chars().count();
            if got != width {
                return Err(Error::RaggedLayout {
                    row,
                    expected: width,
                    got,
                });
            }

            let y = (height - 1 - row) as i32;
            for (column, character) in line.chars().enumerate() {
                let position = Position::new(column as i32, y);
                match character {
                    '%' => {
                        walls.insert(position);
                    }
                    '.' => {
                        food.insert(position);
                    }
                    'o' => {
                        capsules.insert(position);
                    }
                    'P' => agent_starts.push(position),
                    'G' => ghost_starts.push(position),
                    ' ' => {}
                    _ => {
                        return Err(Error::InvalidLayoutCharacter {
                            character,
                            row,
                            column,
                        });
                    }
                }
            }
        }

        let agent_start = match agent_starts.as_slice() {
            [] => return Err(Error::MissingAgentStart),
            [start] => *start,
            many => return Err(Error::MultipleAgentStarts { count: many.len() }),
        };

        Ok(Self {
            width: width as i32,
            height: height as i32,
            walls,
            food,
            capsules,
            agent_start,
            ghost_starts,
        })
    }

    /// One of the layouts bundled with the crate, by name.
    pub fn builtin(name: &str) -> Result<Self> {
        let text = match name.trim().to_ascii_lowercase().as_str() {
            "tiny" => TINY,
            "small" => SMALL,
            "medium" => MEDIUM,
            other => {
                return Err(Error::UnknownLayout {
                    name: other.to_string(),
                    expected: BUILTIN_LAYOUTS.join(", "),
                });
            }
        };
        Self::parse(text)
    }

    /// Read and parse a layout file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read layout {}", path.display()),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Walls, with everything outside the grid counted as wall.
    pub fn is_wall(&self, position: Position) -> bool {
        position.x < 0
            || position.y < 0
            || position.x >= self.width
            || position.y >= self.height
            || self.walls.contains(&position)
    }

    pub fn food(&self) -> &BTreeSet<Position> {
        &self.food
    }

    pub fn capsules(&self) -> &BTreeSet<Position> {
        &self.capsules
    }

    pub fn agent_start(&self) -> Position {
        self.agent_start
    }

    pub fn ghost_starts(&self) -> &[Position] {
        &self.ghost_starts
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
