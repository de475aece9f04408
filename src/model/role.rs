#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin,
    Hr,
    Employee,
    System,
    ApiUser,
}

impl TryFrom<u8> for Role {
    type Error = u8;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Ok(match id {
            1 => Role::Admin,
            2 => Role::Hr,
            3 => Role::Employee,
            4 => Role::System,
            5 => Role::ApiUser,
            other => return Err(other),
        })
    }
}

impl Role {
    /// Roles allowed to read any employee's attendance score.
    pub fn can_view_all_scores(&self) -> bool {
        matches!(self, Role::Admin | Role::Hr | Role::System)
    }
}
