//! Magic number table.
//!
//! Each checkpoint kind is identified by a fixed magic number, accepts exactly
//! one format version and stores a fixed field sequence after the common
//! header.
//!
//! | Kind | Magic | Version | Record bytes |
//! |------|-------|---------|--------------|
//! | ECM | `0x1725BCD9` | 1 | 40 |
//! | P-1 | `0x317A394B` | 2 | 60 |
//! | LL | `0x2C7330A8` | 1 | 8 |
//! | PRP | `0x87F2A91B` | 4 | 8 |
//! | Trial factoring | `0x1567234D` | 1 | 0 |

use ckpt_model::WorkKind;

/// Trial factoring checkpoint magic.
pub const FACTOR_MAGIC: u32 = 0x1567_234D;
/// Lucas-Lehmer checkpoint magic.
pub const LL_MAGIC: u32 = 0x2C73_30A8;
/// PRP checkpoint magic.
pub const PRP_MAGIC: u32 = 0x87F2_A91B;
/// ECM checkpoint magic.
pub const ECM_MAGIC: u32 = 0x1725_BCD9;
/// P-1 checkpoint magic.
pub const PM1_MAGIC: u32 = 0x317A_394B;
/// Spool file magic. Known to the client but not a checkpoint.
pub const SPOOL_MAGIC: u32 = 0x73D3_92AC;

/// Primitive field encodings (all little-endian).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Unsigned 32-bit integer.
    U32,
    /// Signed 32-bit integer.
    I32,
    /// Unsigned 64-bit integer.
    U64,
    /// IEEE double.
    F64,
}

impl FieldType {
    /// Encoded width in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::U32 | Self::I32 => 4,
            Self::U64 | Self::F64 => 8,
        }
    }
}

/// One field of a kind-specific record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name used in error messages.
    pub name: &'static str,
    /// Encoding.
    pub ty: FieldType,
}

const fn field(name: &'static str, ty: FieldType) -> Field {
    Field { name, ty }
}

/// Format description for one magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    /// Magic number.
    pub magic: u32,
    /// Computation kind.
    pub kind: WorkKind,
    /// The only accepted version.
    pub version: u32,
    /// Kind-specific fields in on-disk order.
    pub fields: &'static [Field],
}

impl FormatSpec {
    /// Byte length of the kind-specific record.
    #[must_use]
    pub fn record_len(&self) -> usize {
        self.fields.iter().map(|f| f.ty.width()).sum()
    }
}

const ECM_FIELDS: &[Field] = &[
    field("stage", FieldType::U32),
    field("curve", FieldType::U32),
    field("sigma", FieldType::F64),
    field("B", FieldType::U64),
    field("B_done", FieldType::U64),
    field("C_done", FieldType::U64),
];

const PM1_FIELDS: &[Field] = &[
    field("stage", FieldType::U32),
    field("B_done", FieldType::U64),
    field("B", FieldType::U64),
    field("C_done", FieldType::U64),
    field("C_start", FieldType::U64),
    field("C", FieldType::U64),
    field("processed", FieldType::U64),
    field("D", FieldType::U32),
    field("E", FieldType::U32),
];

const ITERATION_FIELDS: &[Field] = &[
    field("error_count", FieldType::U32),
    field("iterations", FieldType::U32),
];

/// Every recognized checkpoint format.
pub const FORMATS: [FormatSpec; 5] = [
    FormatSpec {
        magic: ECM_MAGIC,
        kind: WorkKind::Ecm,
        version: 1,
        fields: ECM_FIELDS,
    },
    FormatSpec {
        magic: PM1_MAGIC,
        kind: WorkKind::PMinus1,
        version: 2,
        fields: PM1_FIELDS,
    },
    FormatSpec {
        magic: LL_MAGIC,
        kind: WorkKind::LucasLehmer,
        version: 1,
        fields: ITERATION_FIELDS,
    },
    FormatSpec {
        magic: PRP_MAGIC,
        kind: WorkKind::Prp,
        version: 4,
        fields: ITERATION_FIELDS,
    },
    FormatSpec {
        magic: FACTOR_MAGIC,
        kind: WorkKind::TrialFactor,
        version: 1,
        fields: &[],
    },
];

/// Find the format for a magic number.
#[must_use]
pub fn lookup_format(magic: u32) -> Option<&'static FormatSpec> {
    FORMATS.iter().find(|format| format.magic == magic)
}

/// Find the format that stores checkpoints of `kind`.
#[must_use]
pub fn format_for_kind(kind: WorkKind) -> Option<&'static FormatSpec> {
    FORMATS.iter().find(|format| format.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_required_versions() {
        let expected = [
            (ECM_MAGIC, WorkKind::Ecm, 1),
            (PM1_MAGIC, WorkKind::PMinus1, 2),
            (LL_MAGIC, WorkKind::LucasLehmer, 1),
            (PRP_MAGIC, WorkKind::Prp, 4),
            (FACTOR_MAGIC, WorkKind::TrialFactor, 1),
        ];
        for (magic, kind, version) in expected {
            let format = lookup_format(magic).expect("known magic");
            assert_eq!(format.kind, kind);
            assert_eq!(format.version, version);
            assert_eq!(format_for_kind(kind), Some(format));
        }
    }

    #[test]
    fn magic_numbers_are_distinct() {
        for (i, a) in FORMATS.iter().enumerate() {
            for b in &FORMATS[i + 1..] {
                assert_ne!(a.magic, b.magic);
            }
        }
        assert!(lookup_format(SPOOL_MAGIC).is_none());
    }

    #[test]
    fn record_lengths() {
        assert_eq!(lookup_format(ECM_MAGIC).map(FormatSpec::record_len), Some(40));
        assert_eq!(lookup_format(PM1_MAGIC).map(FormatSpec::record_len), Some(60));
        assert_eq!(lookup_format(LL_MAGIC).map(FormatSpec::record_len), Some(8));
        assert_eq!(lookup_format(FACTOR_MAGIC).map(FormatSpec::record_len), Some(0));
    }

    #[test]
    fn double_check_has_no_checkpoint_format() {
        assert!(format_for_kind(WorkKind::DoubleCheck).is_none());
        assert!(format_for_kind(WorkKind::None).is_none());
    }
}
