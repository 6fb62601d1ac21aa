//! Result code catalogues.
//!
//! Codes are kept open-ended: a value outside the catalogue decodes to
//! `Other(code)` so newer network codes still surface to callers.

use std::fmt;

use crate::{
    models::XdrError,
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

macro_rules! result_codes {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident = $value:literal => $label:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$variant_meta])* $variant,)*
            Other(i32),
        }

        impl $name {
            pub fn from_code(code: i32) -> Self {
                match code {
                    $($value => $name::$variant,)*
                    other => $name::Other(other),
                }
            }

            pub fn code(&self) -> i32 {
                match self {
                    $($name::$variant => $value,)*
                    $name::Other(code) => *code,
                }
            }

            /// Name as Horizon reports it in `result_codes`.
            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)*
                    $name::Other(_) => "unknown",
                }
            }

            pub fn is_success(&self) -> bool {
                self.code() == 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $name::Other(code) => write!(f, "unknown ({})", code),
                    known => f.write_str(known.name()),
                }
            }
        }

        impl XdrEncode for $name {
            fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
                writer.write_i32(self.code());
                Ok(())
            }
        }

        impl XdrDecode for $name {
            fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
                Ok($name::from_code(reader.read_i32()?))
            }
        }
    };
}

result_codes! {
    /// Transaction-level outcome.
    TransactionResultCode {
        /// All operations succeeded.
        Success = 0 => "tx_success",
        /// One of the operations failed; none were applied.
        Failed = -1 => "tx_failed",
        TooEarly = -2 => "tx_too_early",
        TooLate = -3 => "tx_too_late",
        MissingOperation = -4 => "tx_missing_operation",
        /// Sequence number does not match the source account.
        BadSeq = -5 => "tx_bad_seq",
        /// Too few valid signatures, or signed for another network.
        BadAuth = -6 => "tx_bad_auth",
        /// Fee would bring the account below its reserve.
        InsufficientBalance = -7 => "tx_insufficient_balance",
        NoAccount = -8 => "tx_no_source_account",
        InsufficientFee = -9 => "tx_insufficient_fee",
        /// Unused signatures attached.
        BadAuthExtra = -10 => "tx_bad_auth_extra",
        InternalError = -11 => "tx_internal_error",
    }
}

impl TransactionResultCode {
    /// Whether per-operation results follow the code on the wire.
    pub fn has_operation_results(&self) -> bool {
        matches!(
            self,
            TransactionResultCode::Success | TransactionResultCode::Failed
        )
    }
}

result_codes! {
    /// Envelope code of one operation result; non-zero means the operation
    /// did not run and carries no type-specific result.
    OperationResultCode {
        Inner = 0 => "op_inner",
        BadAuth = -1 => "op_bad_auth",
        NoAccount = -2 => "op_no_source_account",
        NotSupported = -3 => "op_not_supported",
        TooManySubentries = -4 => "op_too_many_subentries",
        ExceededWorkLimit = -5 => "op_exceeded_work_limit",
    }
}

result_codes! {
    CreateAccountResultCode {
        Success = 0 => "op_success",
        /// Invalid destination.
        Malformed = -1 => "op_malformed",
        Underfunded = -2 => "op_underfunded",
        /// Starting balance below the reserve.
        LowReserve = -3 => "op_low_reserve",
        AlreadyExists = -4 => "op_already_exists",
    }
}

result_codes! {
    PaymentResultCode {
        Success = 0 => "op_success",
        Malformed = -1 => "op_malformed",
        Underfunded = -2 => "op_underfunded",
        SrcNoTrust = -3 => "op_src_no_trust",
        SrcNotAuthorized = -4 => "op_src_not_authorized",
        NoDestination = -5 => "op_no_destination",
        /// Destination is missing a trust line for the asset.
        NoTrust = -6 => "op_no_trust",
        NotAuthorized = -7 => "op_not_authorized",
        LineFull = -8 => "op_line_full",
        NoIssuer = -9 => "op_no_issuer",
    }
}

result_codes! {
    /// Outcome of manage sell offer, manage buy offer and the legacy manage offer.
    ManageOfferResultCode {
        Success = 0 => "op_success",
        Malformed = -1 => "op_malformed",
        /// No trust line for the asset being sold.
        SellNoTrust = -2 => "op_sell_no_trust",
        /// No trust line for the asset being bought.
        BuyNoTrust = -3 => "op_buy_no_trust",
        SellNotAuthorized = -4 => "op_sell_not_authorized",
        BuyNotAuthorized = -5 => "op_buy_not_authorized",
        LineFull = -6 => "op_line_full",
        Underfunded = -7 => "op_underfunded",
        CrossSelf = -8 => "op_cross_self",
        SellNoIssuer = -9 => "op_sell_no_issuer",
        BuyNoIssuer = -10 => "op_buy_no_issuer",
        NotFound = -11 => "op_offer_not_found",
        LowReserve = -12 => "op_low_reserve",
    }
}

result_codes! {
    ChangeTrustResultCode {
        Success = 0 => "op_success",
        Malformed = -1 => "op_malformed",
        NoIssuer = -2 => "op_no_issuer",
        /// Cannot drop the limit below the balance.
        InvalidLimit = -3 => "op_invalid_limit",
        LowReserve = -4 => "op_low_reserve",
        SelfNotAllowed = -5 => "op_self_not_allowed",
    }
}

result_codes! {
    AllowTrustResultCode {
        Success = 0 => "op_success",
        Malformed = -1 => "op_malformed",
        NoTrustLine = -2 => "op_no_trust_line",
        TrustNotRequired = -3 => "op_trust_not_required",
        CantRevoke = -4 => "op_cant_revoke",
        SelfNotAllowed = -5 => "op_self_not_allowed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(TransactionResultCode::from_code(-5), TransactionResultCode::BadSeq);
        assert_eq!(TransactionResultCode::BadSeq.code(), -5);
        assert_eq!(TransactionResultCode::BadSeq.to_string(), "tx_bad_seq");
        assert_eq!(
            ManageOfferResultCode::from_code(-3),
            ManageOfferResultCode::BuyNoTrust
        );
        assert_eq!(PaymentResultCode::from_code(-9).name(), "op_no_issuer");
    }

    #[test]
    fn test_unknown_codes_are_kept() {
        let code = TransactionResultCode::from_code(-14);
        assert_eq!(code, TransactionResultCode::Other(-14));
        assert_eq!(code.code(), -14);
        assert_eq!(code.to_string(), "unknown (-14)");
    }

    #[test]
    fn test_operation_results_presence() {
        assert!(TransactionResultCode::Success.has_operation_results());
        assert!(TransactionResultCode::Failed.has_operation_results());
        assert!(!TransactionResultCode::BadSeq.has_operation_results());
    }

    #[test]
    fn test_xdr_is_signed_int() {
        let bytes = ChangeTrustResultCode::LowReserve.to_xdr().unwrap();
        assert_eq!(bytes, (-4i32).to_be_bytes());
        assert_eq!(
            ChangeTrustResultCode::from_xdr(&bytes).unwrap(),
            ChangeTrustResultCode::LowReserve
        );
    }
}
