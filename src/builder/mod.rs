mod qr;

pub use qr::{Module, QR};

use std::ops::Deref;

use crate::common::{
    codec::{assemble, fit_version, resolve, Content, Mode},
    ec::ecc,
    error::{QRError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{ECLevel, Version},
    BitStream,
};

pub struct QRBuilder<'a> {
    content: Content<'a>,
    version: Option<usize>,
    ec_level: ECLevel,
    mode: Option<Mode>,
    encoding: Option<&'a str>,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new<C: Into<Content<'a>>>(content: C) -> Self {
        Self {
            content: content.into(),
            version: None,
            ec_level: ECLevel::H,
            mode: None,
            encoding: None,
            mask: None,
        }
    }

    pub fn content<C: Into<Content<'a>>>(&mut self, content: C) -> &mut Self {
        self.content = content.into();
        self
    }

    pub fn version(&mut self, version: usize) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    /// Encoding label for Byte-mode text, resolved through
    /// `encoding_rs::Encoding::for_label`. Defaults to ISO 8859-1.
    pub fn encoding(&mut self, label: &'a str) -> &mut Self {
        self.encoding = Some(label);
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!("{{ Version: {v}, Ec level: {:?} }}", self.ec_level),
            None => format!("{{ Version: None, Ec level: {:?} }}", self.ec_level),
        }
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        println!("\nGenerating QR {}...", self.metadata());
        if self.content.is_empty() {
            return Err(QRError::EmptyData);
        }

        println!("Classifying content & encoding data...");
        let (mode, payload) = resolve(self.content, self.mode, self.encoding)?;

        // A caller-supplied version must hold the data; a larger one is
        // honored as-is, never downgraded
        let min_version = fit_version(&payload, mode, self.ec_level)?;
        let version = match self.version {
            Some(v) => {
                let requested = Version::new(v)?;
                if requested < min_version {
                    return Err(QRError::VersionTooSmall { requested: v, needed: *min_version });
                }
                requested
            }
            None => min_version,
        };

        let encoded = assemble(&payload, mode, version, self.ec_level)?;

        println!("Computing ecc & interleaving...");
        let (data_blocks, ecc_blocks) = Self::compute_ecc(encoded.data(), version, self.ec_level)?;
        let mut interleaved = BitStream::new(version.total_codewords() << 3);
        interleaved.extend(&Self::interleave(&data_blocks));
        interleaved.extend(&Self::interleave(&ecc_blocks));

        println!("Drawing function patterns & encoding region...");
        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(interleaved);

        let mask = match self.mask {
            Some(m) => {
                qr.apply_mask(m);
                m
            }
            None => {
                println!("Finding & applying best mask...");
                apply_best_mask(&mut qr)
            }
        };

        println!("\x1b[1;32mQR generated successfully with mask {}\x1b[0m\n", *mask);

        Ok(qr)
    }

    fn compute_ecc(
        data: &[u8],
        version: Version,
        ec_level: ECLevel,
    ) -> QRResult<(Vec<&[u8]>, Vec<Vec<u8>>)> {
        let data_blocks = Self::blockify(data, version, ec_level)?;

        let ecc_size_per_block = version.ecc_per_block(ec_level);
        let ecc_blocks =
            data_blocks.iter().map(|b| ecc(b, ecc_size_per_block)).collect::<Vec<_>>();

        Ok((data_blocks, ecc_blocks))
    }

    pub(crate) fn blockify(
        data: &[u8],
        version: Version,
        ec_level: ECLevel,
    ) -> QRResult<Vec<&[u8]>> {
        let (block1_size, block1_count, block2_size, block2_count) =
            version.data_codewords_per_block(ec_level);

        let total_block1_size = block1_size * block1_count;
        let total_size = total_block1_size + block2_size * block2_count;

        // The block table and the assembled stream disagreeing is an
        // unrecoverable precondition failure, never silently truncated
        if total_size != data.len() {
            return Err(QRError::CodewordMismatch { expected: total_size, actual: data.len() });
        }

        let mut data_blocks = Vec::with_capacity(block1_count + block2_count);
        data_blocks.extend(data[..total_block1_size].chunks(block1_size));
        if block2_count > 0 {
            data_blocks.extend(data[total_block1_size..].chunks(block2_size));
        }
        Ok(data_blocks)
    }

    pub(crate) fn interleave<T: Copy, V: Deref<Target = [T]>>(blocks: &[V]) -> Vec<T> {
        let max_block_size = blocks.iter().map(|b| b.len()).max().expect("Blocks is empty");
        let total_size = blocks.iter().map(|b| b.len()).sum::<usize>();
        let mut res = Vec::with_capacity(total_size);
        for i in 0..max_block_size {
            for b in blocks {
                if i < b.len() {
                    res.push(b[i]);
                }
            }
        }
        res
    }
}

#[cfg(test)]
mod builder_tests {
    use test_case::test_case;

    use super::QRBuilder;
    use crate::common::error::QRError;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_add_ec_simple() {
        let msg = b" [\x0bx\xd1r\xdcMC@\xec\x11\xec\x11\xec\x11";
        let expected_ecc = [b"\xc4\x23\x27\x77\xeb\xd7\xe7\xe2\x5d\x17"];
        let (_, ecc) = QRBuilder::compute_ecc(msg, Version(1), ECLevel::M).unwrap();
        assert_eq!(&*ecc, expected_ecc);
    }

    #[test]
    fn test_add_ec_complex() {
        let msg = b"CUF\x86W&U\xc2w2\x06\x12\x06g&\xf6\xf6B\x07v\x86\xf2\x07&V\x16\xc6\xc7\x92\x06\
                    \xb6\xe6\xf7w2\x07v\x86W&R\x06\x86\x972\x07F\xf7vV\xc2\x06\x972\x10\xec\x11\xec\
                    \x11\xec\x11\xec";
        let expected_ec = [
            b"\xd5\xc7\x0b\x2d\x73\xf7\xf1\xdf\xe5\xf8\x9a\x75\x9a\x6f\x56\xa1\x6f\x27",
            b"\x57\xcc\x60\x3c\xca\xb6\x7c\x9d\xc8\x86\x1b\x81\xd1\x11\xa3\xa3\x78\x85",
            b"\x94\x74\xb1\xd4\x4c\x85\x4b\xf2\xee\x4c\xc3\xe6\xbd\x0a\x6c\xf0\xc0\x8d",
            b"\xeb\x9f\x05\xad\x18\x93\x3b\x21\x6a\x28\xff\xac\x52\x02\x83\x20\xb2\xec",
        ];
        let (_, ecc) = QRBuilder::compute_ecc(msg, Version(5), ECLevel::Q).unwrap();
        assert_eq!(&*ecc, &expected_ec[..]);
    }

    #[test]
    fn test_blockify_rejects_short_stream() {
        // 61 bytes against the 62 the version 5-Q table expects
        let msg = vec![0u8; 61];
        let res = QRBuilder::blockify(&msg, Version(5), ECLevel::Q);
        assert_eq!(res, Err(QRError::CodewordMismatch { expected: 62, actual: 61 }));
    }

    #[test]
    fn test_interleave() {
        let blocks = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9, 0]];
        let interleaved = QRBuilder::interleave(&blocks);
        let exp_interleaved = vec![1, 4, 7, 2, 5, 8, 3, 6, 9, 0];
        assert_eq!(interleaved, exp_interleaved);
    }

    #[test_case("Hello, world!", 1, ECLevel::L)]
    #[test_case("TEST", 1, ECLevel::M)]
    #[test_case("12345", 1, ECLevel::Q)]
    #[test_case("OK", 1, ECLevel::H)]
    #[test_case("HELLO WORLD", 2, ECLevel::H)]
    #[test_case("A11111111111111", 7, ECLevel::M)]
    #[test_case("1234567890", 10, ECLevel::H)]
    fn test_build_shape(data: &str, version: usize, ec_level: ECLevel) {
        let qr = QRBuilder::new(data).version(version).ec_level(ec_level).build().unwrap();

        assert_eq!(qr.version(), Version(version));
        assert_eq!(qr.width(), version * 4 + 17);
        assert_eq!(qr.ec_level(), ec_level);
        assert!(qr.mask().is_some());

        let matrix = qr.bit_matrix();
        assert_eq!(matrix.len(), qr.width());
        assert!(matrix.iter().all(|row| row.len() == qr.width()));
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = QRBuilder::new("DETERMINISM 101").ec_level(ECLevel::Q).build().unwrap();
        let second = QRBuilder::new("DETERMINISM 101").ec_level(ECLevel::Q).build().unwrap();
        assert_eq!(first.mask(), second.mask());
        assert_eq!(first.bit_matrix(), second.bit_matrix());
    }

    #[test]
    fn test_build_empty_data() {
        assert_eq!(QRBuilder::new("").build(), Err(QRError::EmptyData));
    }

    #[test]
    fn test_build_version_not_downgraded() {
        // Content needing version 1 forced into a version 5 symbol
        let qr = QRBuilder::new("HELLO WORLD").version(5).ec_level(ECLevel::Q).build().unwrap();
        assert_eq!(qr.width(), 37);
    }

    #[test]
    fn test_build_version_too_small() {
        let data = "A".repeat(100);
        let res = QRBuilder::new(data.as_str()).version(1).ec_level(ECLevel::Q).build();
        assert_eq!(res, Err(QRError::VersionTooSmall { requested: 1, needed: 6 }));
    }

    #[test]
    fn test_build_invalid_version() {
        let res = QRBuilder::new("HELLO").version(41).build();
        assert_eq!(res, Err(QRError::InvalidVersion(41)));
    }

    #[test]
    fn test_build_capacity_overflow() {
        let data = "a".repeat(3000);
        let res = QRBuilder::new(data.as_str()).ec_level(ECLevel::H).build();
        assert_eq!(res, Err(QRError::DataTooLong));
    }
}
