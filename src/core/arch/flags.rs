//! Z/NZ architectural flags, updated only by the writeback of ADD/SUB/MUL.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub zero: bool,
    pub non_zero: bool,
}

impl Flags {
    pub fn update(&mut self, value: i64) {
        self.zero = value == 0;
        self.non_zero = value != 0;
    }
}

#[cfg(test)]
mod tests {
    use super::Flags;

    #[test]
    fn flags_track_last_committed_value() {
        let mut flags = Flags::default();
        assert!(!flags.zero, "both flags start clear");
        assert!(!flags.non_zero);
        flags.update(0);
        assert!(flags.zero);
        assert!(!flags.non_zero);
        flags.update(-7);
        assert!(!flags.zero);
        assert!(flags.non_zero);
    }
}
