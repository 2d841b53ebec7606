// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Message segmentation following 3GPP TS 23.038 / 23.040.
//
// This is the rule the Android `SmsManager.divideMessage` primitive applies
// for the default (non-national-table) alphabet. Platforms with a native
// divider use that instead; this reference rule backs the desktop stub and
// the fallback path.

use smsgate_core::types::{MessageSegments, SegmentEncoding};

/// Septets in a single GSM 7-bit message.
pub const GSM7_SINGLE_SEPTETS: usize = 160;
/// Septets per part once a user-data header is needed for concatenation.
pub const GSM7_MULTIPART_SEPTETS: usize = 153;
/// UTF-16 units in a single UCS-2 message.
pub const UCS2_SINGLE_UNITS: usize = 70;
/// UTF-16 units per concatenated UCS-2 part.
pub const UCS2_MULTIPART_UNITS: usize = 67;

/// GSM 03.38 default alphabet, minus the escape character at 0x1B.
const GSM7_BASIC: &str = "@£$¥èéùìòÇ\nØø\rÅåΔ_ΦΓΛΩΠΨΣΘΞÆæßÉ !\"#¤%&'()*+,-./0123456789:;<=>?\
¡ABCDEFGHIJKLMNOPQRSTUVWXYZÄÖÑÜ§¿abcdefghijklmnopqrstuvwxyzäöñüà";

/// Extension table; each costs an escape septet plus its own.
const GSM7_EXTENSION: &str = "\u{0C}^{}\\[~]|€";

struct Budget {
    single: usize,
    multipart: usize,
    weight: fn(char) -> usize,
}

const GSM7_BUDGET: Budget = Budget {
    single: GSM7_SINGLE_SEPTETS,
    multipart: GSM7_MULTIPART_SEPTETS,
    weight: gsm7_weight,
};

const UCS2_BUDGET: Budget = Budget {
    single: UCS2_SINGLE_UNITS,
    multipart: UCS2_MULTIPART_UNITS,
    weight: ucs2_weight,
};

fn gsm7_septets(c: char) -> Option<usize> {
    if GSM7_EXTENSION.contains(c) {
        Some(2)
    } else if GSM7_BASIC.contains(c) {
        Some(1)
    } else {
        None
    }
}

fn gsm7_weight(c: char) -> usize {
    gsm7_septets(c).unwrap_or(1)
}

fn ucs2_weight(c: char) -> usize {
    c.len_utf16()
}

/// Splits message bodies into transport-sized segments.
///
/// Pure and total: every input, including the empty string, yields at least
/// one segment, and the segments concatenate back to the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageSegmenter;

impl MessageSegmenter {
    /// Encoding the transport will pick for `message`.
    pub fn encoding(&self, message: &str) -> SegmentEncoding {
        if message.chars().all(|c| gsm7_septets(c).is_some()) {
            SegmentEncoding::Gsm7
        } else {
            SegmentEncoding::Ucs2
        }
    }

    pub fn segment(&self, message: &str) -> MessageSegments {
        let budget = match self.encoding(message) {
            SegmentEncoding::Gsm7 => &GSM7_BUDGET,
            SegmentEncoding::Ucs2 => &UCS2_BUDGET,
        };

        let total: usize = message.chars().map(budget.weight).sum();
        if total <= budget.single {
            return MessageSegments::single(message);
        }

        // Work per char so an escape pair or surrogate pair is never split.
        let mut parts = Vec::with_capacity(total.div_ceil(budget.multipart));
        let mut current = String::new();
        let mut used = 0;
        for c in message.chars() {
            let w = (budget.weight)(c);
            if used + w > budget.multipart {
                parts.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push(c);
            used += w;
        }
        if !current.is_empty() {
            parts.push(current);
        }

        MessageSegments::from_parts(parts)
    }
}
