use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = i64;
pub type TournamentId = i64;
pub type MatchId = i64;
pub type ReferralId = i64;
pub type Points = i64;

/// Enums persisted as TEXT columns, spelled the same way in SQL and JSON
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("Unknown {} value: {}", stringify!($name), other)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;
                text.parse()
                    .map_err(|e: String| FromSqlError::Other(e.into()))
            }
        }
    };
}

text_enum!(TournamentStatus {
    Upcoming => "UPCOMING",
    Ongoing => "ONGOING",
    Finished => "FINISHED",
});

text_enum!(Category {
    Men => "MEN",
    Women => "WOMEN",
    Mixed => "MIXED",
});

text_enum!(Region {
    North => "NORTH",
    South => "SOUTH",
    Center => "CENTER",
    All => "ALL",
});

text_enum!(ScoringSystem {
    Olympic => "OLYMPIC",
    RoundRobin => "ROUND_ROBIN",
});

text_enum!(MatchStatus {
    Scheduled => "SCHEDULED",
    InProgress => "IN_PROGRESS",
    Disputed => "DISPUTED",
    Finished => "FINISHED",
    Cancelled => "CANCELLED",
});

text_enum!(ReferralStatus {
    Pending => "PENDING",
    Paid => "PAID",
    Cancelled => "CANCELLED",
});

text_enum!(Gender {
    Male => "M",
    Female => "F",
});

impl MatchStatus {
    /// No further results may be submitted once a match is closed
    pub fn is_closed(&self) -> bool {
        matches!(self, MatchStatus::Finished | MatchStatus::Cancelled)
    }
}

/// Which seat of a match a player occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }
}
