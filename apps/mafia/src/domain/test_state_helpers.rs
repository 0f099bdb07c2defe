use crate::domain::roles::Role;
use crate::domain::session::Session;
use crate::domain::state::{Phase, Player, PlayerId, Roster};

/// Living roster with ids 1..=n holding `roles` in order.
pub fn roster_with_roles(roles: &[Role]) -> Roster {
    roles
        .iter()
        .enumerate()
        .map(|(i, role)| {
            let id = i as PlayerId + 1;
            let mut player = Player::new(id, format!("p{id}"));
            player.role = Some(*role);
            player
        })
        .collect()
}

/// Session already in its first night with `roles` dealt to ids 1..=n.
/// Player 1 is the creator.
pub fn night_session(roles: &[Role], seed: u64) -> Session {
    let mut session = Session::new(100, 1, seed);
    for i in 0..roles.len() {
        let id = i as PlayerId + 1;
        session
            .join(id, format!("p{id}"))
            .expect("join in registration");
    }
    session.install_roles(roles);
    assert_eq!(session.phase(), Phase::Night);
    session
}

pub fn kill(roster: &mut Roster, id: PlayerId) {
    if let Some(player) = roster.get_mut(id) {
        player.alive = false;
    }
}
