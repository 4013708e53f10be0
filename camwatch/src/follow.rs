use camwatch_codecs::server::FollowButton;

/// Whether the map recenters on every position update.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FollowMode {
    on: bool,
}

impl Default for FollowMode {
    fn default() -> Self {
        Self { on: true }
    }
}

impl FollowMode {
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn toggle(&mut self) -> bool {
        self.on = !self.on;
        self.on
    }

    pub fn button(&self) -> FollowButton {
        let (label, color) = if self.on {
            ("Follow Me: ON", "#0f0")
        } else {
            ("Follow Me: OFF", "#f00")
        };
        FollowButton {
            label: label.to_string(),
            color: color.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn starts_on() {
        let follow = FollowMode::default();
        assert!(follow.is_on());
        assert_eq!("Follow Me: ON", follow.button().label);
        assert_eq!("#0f0", follow.button().color);
    }

    #[test]
    fn double_toggle_restores() {
        let mut follow = FollowMode::default();
        assert!(!follow.toggle());
        assert_eq!("Follow Me: OFF", follow.button().label);
        assert_eq!("#f00", follow.button().color);
        assert!(follow.toggle());
        assert_eq!(FollowMode::default(), follow);
    }
}
