use sea_orm::{DeriveActiveEnum, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum Alliance {
    #[sea_orm(string_value = "RED")]
    Red,
    #[sea_orm(string_value = "BLUE")]
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum Winner {
    #[sea_orm(string_value = "RED")]
    Red,
    #[sea_orm(string_value = "BLUE")]
    Blue,
    #[sea_orm(string_value = "TIE")]
    Tie,
}

impl Winner {
    pub fn from_scores(red: i32, blue: i32) -> Winner {
        match red.cmp(&blue) {
            std::cmp::Ordering::Greater => Winner::Red,
            std::cmp::Ordering::Less => Winner::Blue,
            std::cmp::Ordering::Equal => Winner::Tie,
        }
    }
}

impl Alliance {
    pub fn matches_winner(self, winner: Winner) -> bool {
        matches!(
            (self, winner),
            (Alliance::Red, Winner::Red) | (Alliance::Blue, Winner::Blue)
        )
    }
}
