//! Opcode table

/// EVM opcodes (see Yellow Paper Appendix H)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    // Stop and Arithmetic
    STOP = 0x00,
    ADD = 0x01,
    MUL = 0x02,
    SUB = 0x03,
    DIV = 0x04,
    SDIV = 0x05,
    MOD = 0x06,
    SMOD = 0x07,
    ADDMOD = 0x08,
    MULMOD = 0x09,
    EXP = 0x0A,
    SIGNEXTEND = 0x0B,

    // Comparison & Bitwise Logic
    LT = 0x10,
    GT = 0x11,
    SLT = 0x12,
    SGT = 0x13,
    EQ = 0x14,
    ISZERO = 0x15,
    AND = 0x16,
    OR = 0x17,
    XOR = 0x18,
    NOT = 0x19,
    BYTE = 0x1A,
    SHL = 0x1B,
    SHR = 0x1C,
    SAR = 0x1D,

    // SHA3
    SHA3 = 0x20,

    // Environmental Information
    ADDRESS = 0x30,
    BALANCE = 0x31,
    ORIGIN = 0x32,
    CALLER = 0x33,
    CALLVALUE = 0x34,
    CALLDATALOAD = 0x35,
    CALLDATASIZE = 0x36,
    CALLDATACOPY = 0x37,
    CODESIZE = 0x38,
    CODECOPY = 0x39,
    GASPRICE = 0x3A,
    EXTCODESIZE = 0x3B,
    EXTCODECOPY = 0x3C,
    RETURNDATASIZE = 0x3D,
    RETURNDATACOPY = 0x3E,
    EXTCODEHASH = 0x3F,

    // Block Information
    BLOCKHASH = 0x40,
    COINBASE = 0x41,
    TIMESTAMP = 0x42,
    NUMBER = 0x43,
    PREVRANDAO = 0x44,
    GASLIMIT = 0x45,
    CHAINID = 0x46,
    SELFBALANCE = 0x47,
    BASEFEE = 0x48,

    // Stack, Memory, Storage and Flow Operations
    POP = 0x50,
    MLOAD = 0x51,
    MSTORE = 0x52,
    MSTORE8 = 0x53,
    SLOAD = 0x54,
    SSTORE = 0x55,
    JUMP = 0x56,
    JUMPI = 0x57,
    PC = 0x58,
    MSIZE = 0x59,
    GAS = 0x5A,
    JUMPDEST = 0x5B,
    TLOAD = 0x5C,
    TSTORE = 0x5D,
    MCOPY = 0x5E,
    PUSH0 = 0x5F,

    // Push Operations
    PUSH1 = 0x60,
    PUSH2 = 0x61,
    PUSH3 = 0x62,
    PUSH4 = 0x63,
    PUSH5 = 0x64,
    PUSH6 = 0x65,
    PUSH7 = 0x66,
    PUSH8 = 0x67,
    PUSH9 = 0x68,
    PUSH10 = 0x69,
    PUSH11 = 0x6A,
    PUSH12 = 0x6B,
    PUSH13 = 0x6C,
    PUSH14 = 0x6D,
    PUSH15 = 0x6E,
    PUSH16 = 0x6F,
    PUSH17 = 0x70,
    PUSH18 = 0x71,
    PUSH19 = 0x72,
    PUSH20 = 0x73,
    PUSH21 = 0x74,
    PUSH22 = 0x75,
    PUSH23 = 0x76,
    PUSH24 = 0x77,
    PUSH25 = 0x78,
    PUSH26 = 0x79,
    PUSH27 = 0x7A,
    PUSH28 = 0x7B,
    PUSH29 = 0x7C,
    PUSH30 = 0x7D,
    PUSH31 = 0x7E,
    PUSH32 = 0x7F,

    // Dup Operations
    DUP1 = 0x80,
    DUP2 = 0x81,
    DUP3 = 0x82,
    DUP4 = 0x83,
    DUP5 = 0x84,
    DUP6 = 0x85,
    DUP7 = 0x86,
    DUP8 = 0x87,
    DUP9 = 0x88,
    DUP10 = 0x89,
    DUP11 = 0x8A,
    DUP12 = 0x8B,
    DUP13 = 0x8C,
    DUP14 = 0x8D,
    DUP15 = 0x8E,
    DUP16 = 0x8F,

    // Swap Operations
    SWAP1 = 0x90,
    SWAP2 = 0x91,
    SWAP3 = 0x92,
    SWAP4 = 0x93,
    SWAP5 = 0x94,
    SWAP6 = 0x95,
    SWAP7 = 0x96,
    SWAP8 = 0x97,
    SWAP9 = 0x98,
    SWAP10 = 0x99,
    SWAP11 = 0x9A,
    SWAP12 = 0x9B,
    SWAP13 = 0x9C,
    SWAP14 = 0x9D,
    SWAP15 = 0x9E,
    SWAP16 = 0x9F,

    // Logging
    LOG0 = 0xA0,
    LOG1 = 0xA1,
    LOG2 = 0xA2,
    LOG3 = 0xA3,
    LOG4 = 0xA4,

    // System Operations
    CREATE = 0xF0,
    CALL = 0xF1,
    CALLCODE = 0xF2,
    RETURN = 0xF3,
    DELEGATECALL = 0xF4,
    CREATE2 = 0xF5,
    STATICCALL = 0xFA,
    REVERT = 0xFD,
    INVALID = 0xFE,
    SELFDESTRUCT = 0xFF,
}

impl Opcode {
    /// Decode a byte; unassigned bytes yield `None`
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::STOP),
            0x01 => Some(Self::ADD),
            0x02 => Some(Self::MUL),
            0x03 => Some(Self::SUB),
            0x04 => Some(Self::DIV),
            0x05 => Some(Self::SDIV),
            0x06 => Some(Self::MOD),
            0x07 => Some(Self::SMOD),
            0x08 => Some(Self::ADDMOD),
            0x09 => Some(Self::MULMOD),
            0x0A => Some(Self::EXP),
            0x0B => Some(Self::SIGNEXTEND),
            0x10 => Some(Self::LT),
            0x11 => Some(Self::GT),
            0x12 => Some(Self::SLT),
            0x13 => Some(Self::SGT),
            0x14 => Some(Self::EQ),
            0x15 => Some(Self::ISZERO),
            0x16 => Some(Self::AND),
            0x17 => Some(Self::OR),
            0x18 => Some(Self::XOR),
            0x19 => Some(Self::NOT),
            0x1A => Some(Self::BYTE),
            0x1B => Some(Self::SHL),
            0x1C => Some(Self::SHR),
            0x1D => Some(Self::SAR),
            0x20 => Some(Self::SHA3),
            0x30 => Some(Self::ADDRESS),
            0x31 => Some(Self::BALANCE),
            0x32 => Some(Self::ORIGIN),
            0x33 => Some(Self::CALLER),
            0x34 => Some(Self::CALLVALUE),
            0x35 => Some(Self::CALLDATALOAD),
            0x36 => Some(Self::CALLDATASIZE),
            0x37 => Some(Self::CALLDATACOPY),
            0x38 => Some(Self::CODESIZE),
            0x39 => Some(Self::CODECOPY),
            0x3A => Some(Self::GASPRICE),
            0x3B => Some(Self::EXTCODESIZE),
            0x3C => Some(Self::EXTCODECOPY),
            0x3D => Some(Self::RETURNDATASIZE),
            0x3E => Some(Self::RETURNDATACOPY),
            0x3F => Some(Self::EXTCODEHASH),
            0x40 => Some(Self::BLOCKHASH),
            0x41 => Some(Self::COINBASE),
            0x42 => Some(Self::TIMESTAMP),
            0x43 => Some(Self::NUMBER),
            0x44 => Some(Self::PREVRANDAO),
            0x45 => Some(Self::GASLIMIT),
            0x46 => Some(Self::CHAINID),
            0x47 => Some(Self::SELFBALANCE),
            0x48 => Some(Self::BASEFEE),
            0x50 => Some(Self::POP),
            0x51 => Some(Self::MLOAD),
            0x52 => Some(Self::MSTORE),
            0x53 => Some(Self::MSTORE8),
            0x54 => Some(Self::SLOAD),
            0x55 => Some(Self::SSTORE),
            0x56 => Some(Self::JUMP),
            0x57 => Some(Self::JUMPI),
            0x58 => Some(Self::PC),
            0x59 => Some(Self::MSIZE),
            0x5A => Some(Self::GAS),
            0x5B => Some(Self::JUMPDEST),
            0x5C => Some(Self::TLOAD),
            0x5D => Some(Self::TSTORE),
            0x5E => Some(Self::MCOPY),
            0x5F => Some(Self::PUSH0),
            0x60 => Some(Self::PUSH1),
            0x61 => Some(Self::PUSH2),
            0x62 => Some(Self::PUSH3),
            0x63 => Some(Self::PUSH4),
            0x64 => Some(Self::PUSH5),
            0x65 => Some(Self::PUSH6),
            0x66 => Some(Self::PUSH7),
            0x67 => Some(Self::PUSH8),
            0x68 => Some(Self::PUSH9),
            0x69 => Some(Self::PUSH10),
            0x6A => Some(Self::PUSH11),
            0x6B => Some(Self::PUSH12),
            0x6C => Some(Self::PUSH13),
            0x6D => Some(Self::PUSH14),
            0x6E => Some(Self::PUSH15),
            0x6F => Some(Self::PUSH16),
            0x70 => Some(Self::PUSH17),
            0x71 => Some(Self::PUSH18),
            0x72 => Some(Self::PUSH19),
            0x73 => Some(Self::PUSH20),
            0x74 => Some(Self::PUSH21),
            0x75 => Some(Self::PUSH22),
            0x76 => Some(Self::PUSH23),
            0x77 => Some(Self::PUSH24),
            0x78 => Some(Self::PUSH25),
            0x79 => Some(Self::PUSH26),
            0x7A => Some(Self::PUSH27),
            0x7B => Some(Self::PUSH28),
            0x7C => Some(Self::PUSH29),
            0x7D => Some(Self::PUSH30),
            0x7E => Some(Self::PUSH31),
            0x7F => Some(Self::PUSH32),
            0x80 => Some(Self::DUP1),
            0x81 => Some(Self::DUP2),
            0x82 => Some(Self::DUP3),
            0x83 => Some(Self::DUP4),
            0x84 => Some(Self::DUP5),
            0x85 => Some(Self::DUP6),
            0x86 => Some(Self::DUP7),
            0x87 => Some(Self::DUP8),
            0x88 => Some(Self::DUP9),
            0x89 => Some(Self::DUP10),
            0x8A => Some(Self::DUP11),
            0x8B => Some(Self::DUP12),
            0x8C => Some(Self::DUP13),
            0x8D => Some(Self::DUP14),
            0x8E => Some(Self::DUP15),
            0x8F => Some(Self::DUP16),
            0x90 => Some(Self::SWAP1),
            0x91 => Some(Self::SWAP2),
            0x92 => Some(Self::SWAP3),
            0x93 => Some(Self::SWAP4),
            0x94 => Some(Self::SWAP5),
            0x95 => Some(Self::SWAP6),
            0x96 => Some(Self::SWAP7),
            0x97 => Some(Self::SWAP8),
            0x98 => Some(Self::SWAP9),
            0x99 => Some(Self::SWAP10),
            0x9A => Some(Self::SWAP11),
            0x9B => Some(Self::SWAP12),
            0x9C => Some(Self::SWAP13),
            0x9D => Some(Self::SWAP14),
            0x9E => Some(Self::SWAP15),
            0x9F => Some(Self::SWAP16),
            0xA0 => Some(Self::LOG0),
            0xA1 => Some(Self::LOG1),
            0xA2 => Some(Self::LOG2),
            0xA3 => Some(Self::LOG3),
            0xA4 => Some(Self::LOG4),
            0xF0 => Some(Self::CREATE),
            0xF1 => Some(Self::CALL),
            0xF2 => Some(Self::CALLCODE),
            0xF3 => Some(Self::RETURN),
            0xF4 => Some(Self::DELEGATECALL),
            0xF5 => Some(Self::CREATE2),
            0xFA => Some(Self::STATICCALL),
            0xFD => Some(Self::REVERT),
            0xFE => Some(Self::INVALID),
            0xFF => Some(Self::SELFDESTRUCT),
            _ => None,
        }
    }

    /// Raw byte value
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Get PUSH operand size (1-32 for PUSH1-PUSH32, 0 otherwise)
    pub fn push_size(self) -> usize {
        let byte = self as u8;
        if (0x60..=0x7F).contains(&byte) {
            (byte - 0x5F) as usize
        } else {
            0
        }
    }

    /// Get DUP depth (1-16 for DUP1-DUP16, 0 otherwise)
    pub fn dup_depth(self) -> usize {
        let byte = self as u8;
        if (0x80..=0x8F).contains(&byte) {
            (byte - 0x7F) as usize
        } else {
            0
        }
    }

    /// Get SWAP depth (1-16 for SWAP1-SWAP16, 0 otherwise)
    pub fn swap_depth(self) -> usize {
        let byte = self as u8;
        if (0x90..=0x9F).contains(&byte) {
            (byte - 0x8F) as usize
        } else {
            0
        }
    }

    /// Get LOG topic count (0-4 for LOG0-LOG4), `None` for other opcodes
    pub fn log_topics(self) -> Option<usize> {
        let byte = self as u8;
        if (0xA0..=0xA4).contains(&byte) {
            Some((byte - 0xA0) as usize)
        } else {
            None
        }
    }

    /// Opcodes that need another frame or account state to execute
    pub fn needs_host(self) -> bool {
        matches!(
            self,
            Opcode::CREATE
                | Opcode::CALL
                | Opcode::CALLCODE
                | Opcode::DELEGATECALL
                | Opcode::CREATE2
                | Opcode::STATICCALL
                | Opcode::SELFDESTRUCT
        )
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_size() {
        assert_eq!(Opcode::PUSH1.push_size(), 1);
        assert_eq!(Opcode::PUSH16.push_size(), 16);
        assert_eq!(Opcode::PUSH32.push_size(), 32);
        assert_eq!(Opcode::PUSH0.push_size(), 0);
        assert_eq!(Opcode::ADD.push_size(), 0);
    }

    #[test]
    fn test_dup_swap_depth() {
        assert_eq!(Opcode::DUP1.dup_depth(), 1);
        assert_eq!(Opcode::DUP16.dup_depth(), 16);
        assert_eq!(Opcode::SWAP1.swap_depth(), 1);
        assert_eq!(Opcode::SWAP16.swap_depth(), 16);
        assert_eq!(Opcode::SWAP1.dup_depth(), 0);
        assert_eq!(Opcode::DUP1.swap_depth(), 0);
    }

    #[test]
    fn test_log_topics() {
        assert_eq!(Opcode::LOG0.log_topics(), Some(0));
        assert_eq!(Opcode::LOG4.log_topics(), Some(4));
        assert_eq!(Opcode::RETURN.log_topics(), None);
    }

    #[test]
    fn test_from_byte_unassigned() {
        for byte in [0x0C, 0x0F, 0x1E, 0x21, 0x49, 0xA5, 0xEF, 0xF6, 0xFB] {
            assert_eq!(Opcode::from_byte(byte), None, "byte 0x{byte:02x}");
        }
    }

    #[test]
    fn test_all_assigned_bytes_roundtrip() {
        let mut assigned = 0;
        for byte in 0..=255u8 {
            if let Some(op) = Opcode::from_byte(byte) {
                assert_eq!(op.as_byte(), byte);
                assigned += 1;
            }
        }
        assert_eq!(assigned, 147);
    }

    #[test]
    fn test_needs_host() {
        assert!(Opcode::CALL.needs_host());
        assert!(Opcode::SELFDESTRUCT.needs_host());
        assert!(!Opcode::RETURN.needs_host());
        assert!(!Opcode::INVALID.needs_host());
    }

    #[test]
    fn test_display() {
        assert_eq!(Opcode::SHA3.to_string(), "SHA3");
        assert_eq!(Opcode::from_byte(0x7F).unwrap().to_string(), "PUSH32");
    }
}
