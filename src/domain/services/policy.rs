use crate::domain::models::{booking::Booking, user::{User, ROLE_ADMIN}};

pub fn is_admin(user: &User) -> bool {
    user.role == ROLE_ADMIN
}

/// A booking may be modified or cancelled only by its owner or an admin.
pub fn can_modify_booking(user: &User, booking: &Booking) -> bool {
    is_admin(user) || booking.user_id == user.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::booking::NewBookingParams;
    use crate::domain::models::user::ROLE_TEACHER;
    use chrono::{Duration, Utc};

    fn user(role: &str) -> User {
        User::new("Ana".into(), format!("{}@school.test", role.to_lowercase()), "hash".into(), role.into())
    }

    fn booking_owned_by(user_id: &str) -> Booking {
        Booking::new(NewBookingParams {
            title: "Staff meeting".into(),
            user_id: user_id.into(),
            room_id: "room-1".into(),
            start: Utc::now(),
            end: Utc::now() + Duration::hours(1),
        })
    }

    #[test]
    fn owner_can_modify_own_booking() {
        let teacher = user(ROLE_TEACHER);
        let booking = booking_owned_by(&teacher.id);
        assert!(can_modify_booking(&teacher, &booking));
    }

    #[test]
    fn admin_can_modify_any_booking() {
        let admin = user(ROLE_ADMIN);
        let booking = booking_owned_by("someone-else");
        assert!(can_modify_booking(&admin, &booking));
    }

    #[test]
    fn non_owner_teacher_cannot_modify() {
        let teacher = user(ROLE_TEACHER);
        let booking = booking_owned_by("someone-else");
        assert!(!can_modify_booking(&teacher, &booking));
    }
}
