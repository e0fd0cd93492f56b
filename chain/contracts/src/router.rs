//! Event router
//!
//! Maps `(source contract, signature)` to a typed [`LedgerEvent`]. Unknown
//! pairs route to `None` and are skipped by the caller. A known pair whose
//! payload is too short is a [`DecodeError`] and the event is rejected.

use crate::abi::{decode, Decoded};
use crate::envelope::{ContractKind, EventName, LogEnvelope, Selector, Signature};
use crate::errors::DecodeError;
use crate::events::*;
use crate::layouts;
use crate::selectors::*;

/// Route one envelope.
pub fn route(envelope: &LogEnvelope) -> Result<Option<LedgerEvent>, DecodeError> {
    match &envelope.signature {
        Signature::Note { selector, .. } => {
            if envelope.data.len() < 4 {
                return Err(DecodeError::MissingSelector);
            }
            route_note(envelope.source, selector, &envelope.data)
        }
        Signature::Event(name) => route_event(envelope.source, *name, &envelope.data),
    }
}

fn route_note(
    source: ContractKind,
    selector: &Selector,
    data: &[u8],
) -> Result<Option<LedgerEvent>, DecodeError> {
    use ContractKind::*;

    let event = match (source, *selector) {
        // ── Vat ──
        (Vat, INIT) => {
            let d = decode(data, layouts::ILK_ONLY)?;
            LedgerEvent::RegisterCollateralType { ilk: d.text("ilk")? }
        }
        (Vat, CAGE) => LedgerEvent::Cage,
        (Vat, VAT_SLIP) => {
            let d = decode(data, layouts::SLIP)?;
            LedgerEvent::Slip(Slip {
                ilk: d.text("ilk")?,
                usr: d.address("usr")?,
                wad: d.int("wad")?,
            })
        }
        (Vat, VAT_FLUX) => {
            let d = decode(data, layouts::FLUX)?;
            LedgerEvent::Flux(Flux {
                ilk: d.text("ilk")?,
                src: d.address("src")?,
                dst: d.address("dst")?,
                wad: d.int("wad")?,
            })
        }
        (Vat, VAT_MOVE) => {
            let d = decode(data, layouts::MOVE)?;
            LedgerEvent::Move(Move {
                src: d.address("src")?,
                dst: d.address("dst")?,
                rad: d.uint("rad")?,
            })
        }
        (Vat, VAT_FROB) => {
            let d = decode(data, layouts::FROB)?;
            LedgerEvent::Frob(Frob {
                ilk: d.text("ilk")?,
                urn: d.address("u")?,
                collateral_from: d.address("v")?,
                dai_to: d.address("w")?,
                dink: d.int("dink")?,
                dart: d.int("dart")?,
            })
        }
        (Vat, VAT_FORK) => {
            let d = decode(data, layouts::FORK)?;
            LedgerEvent::Fork(Fork {
                ilk: d.text("ilk")?,
                src: d.address("src")?,
                dst: d.address("dst")?,
                dink: d.int("dink")?,
                dart: d.int("dart")?,
            })
        }
        (Vat, VAT_GRAB) => {
            let d = decode(data, layouts::FROB)?;
            LedgerEvent::Grab(Grab {
                ilk: d.text("ilk")?,
                urn: d.address("u")?,
                liquidator: d.address("v")?,
                settlement: d.address("w")?,
                dink: d.int("dink")?,
                dart: d.int("dart")?,
            })
        }
        (Vat, VAT_HEAL) => {
            let d = decode(data, layouts::HEAL)?;
            LedgerEvent::Heal(Heal { rad: d.uint("rad")? })
        }
        (Vat, VAT_SUCK) => {
            let d = decode(data, layouts::SUCK)?;
            LedgerEvent::Suck(Suck {
                debtor: d.address("u")?,
                recipient: d.address("v")?,
                rad: d.uint("rad")?,
            })
        }
        (Vat, VAT_FOLD) => {
            let d = decode(data, layouts::FOLD)?;
            LedgerEvent::Fold(Fold {
                ilk: d.text("ilk")?,
                user: d.address("u")?,
                rate: d.int("rate")?,
            })
        }

        // ── Jug ──
        (Jug, INIT) => {
            let d = decode(data, layouts::ILK_ONLY)?;
            LedgerEvent::JugInit { ilk: d.text("ilk")? }
        }
        (Jug, JUG_DRIP) => {
            let d = decode(data, layouts::ILK_ONLY)?;
            LedgerEvent::JugDrip { ilk: d.text("ilk")? }
        }

        // ── Pot ──
        (Pot, CAGE) => LedgerEvent::PotCage,
        (Pot, POT_JOIN) => {
            let d = decode(data, layouts::POT_AMOUNT)?;
            LedgerEvent::PotJoin { wad: d.int("wad")? }
        }
        (Pot, POT_EXIT) => {
            let d = decode(data, layouts::POT_AMOUNT)?;
            LedgerEvent::PotExit { wad: d.int("wad")? }
        }
        (Pot, POT_DRIP) => LedgerEvent::PotDrip,

        // ── Spot ──
        (Spot, SPOT_FILE_PIP) => {
            let d = decode(data, layouts::FILE_ILK_PIP)?;
            LedgerEvent::SpotFilePip(FilePip {
                ilk: d.text("ilk")?,
                val: d.uint("data")?,
            })
        }

        // ── Flop ──
        (Flop, FLOP_DEAL) => {
            let d = decode(data, layouts::DEAL)?;
            LedgerEvent::DebtDeal { id: d.uint("id")? }
        }

        // ── Generic file overloads ──
        (Vat | Jug | Pot | Spot | Flop, FILE_UINT) => {
            file_param(source, &decode(data, layouts::FILE_UINT)?, false, false)?
        }
        (Vat | Jug | Spot, FILE_ILK_UINT) => {
            file_param(source, &decode(data, layouts::FILE_ILK_UINT)?, true, false)?
        }
        (Jug | Pot, FILE_ADDRESS) => {
            file_param(source, &decode(data, layouts::FILE_ADDRESS)?, false, true)?
        }

        _ => return Ok(None),
    };
    Ok(Some(event))
}

fn route_event(
    source: ContractKind,
    name: EventName,
    data: &[u8],
) -> Result<Option<LedgerEvent>, DecodeError> {
    use ContractKind::*;

    let event = match (source, name) {
        (Clipper, EventName::FileUint) => {
            file_param(source, &decode(data, layouts::EVENT_FILE_UINT)?, false, false)?
        }
        (Clipper, EventName::FileAddress) => {
            file_param(source, &decode(data, layouts::EVENT_FILE_ADDRESS)?, false, true)?
        }
        (Dog, EventName::FileIlkUint) => {
            file_param(source, &decode(data, layouts::EVENT_FILE_ILK_UINT)?, true, false)?
        }
        (Clipper, EventName::Kick) => LedgerEvent::SaleKick(sale_kick(data)?),
        (Clipper, EventName::Redo) => LedgerEvent::SaleRedo(sale_kick(data)?),
        (Clipper, EventName::Take) => {
            let d = decode(data, layouts::CLIP_TAKE)?;
            LedgerEvent::SaleTake(SaleTake {
                id: d.uint("id")?,
                max: d.uint("max")?,
                price: d.uint("price")?,
                owe: d.uint("owe")?,
                tab: d.uint("tab")?,
                lot: d.uint("lot")?,
                usr: d.address("usr")?,
            })
        }
        (Clipper, EventName::Yank) => {
            let d = decode(data, layouts::CLIP_YANK)?;
            LedgerEvent::SaleYank { id: d.uint("id")? }
        }
        (Flop, EventName::Kick) => {
            let d = decode(data, layouts::FLOP_KICK)?;
            LedgerEvent::DebtKick(DebtKick {
                id: d.uint("id")?,
                lot: d.uint("lot")?,
                bid: d.uint("bid")?,
                gal: d.address("gal")?,
            })
        }
        (Spot, EventName::Poke) => {
            let d = decode(data, layouts::POKE)?;
            LedgerEvent::Poke(Poke {
                ilk: d.text("ilk")?,
                val: d.uint("val")?,
                spot: d.uint("spot")?,
            })
        }
        (ChainLog, EventName::UpdateAddress) => {
            let d = decode(data, layouts::UPDATE_ADDRESS)?;
            LedgerEvent::UpdateAddress {
                key: d.text("key")?,
                address: d.address("addr")?,
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(event))
}

fn file_param(
    contract: ContractKind,
    d: &Decoded<'_>,
    per_ilk: bool,
    address_value: bool,
) -> Result<LedgerEvent, DecodeError> {
    let ilk = if per_ilk { Some(d.text("ilk")?) } else { None };
    let value = if address_value {
        FileValue::Address(d.address("data")?)
    } else {
        FileValue::Uint(d.uint("data")?)
    };
    Ok(LedgerEvent::File(FileParam {
        contract,
        ilk,
        what: d.text("what")?,
        value,
    }))
}

fn sale_kick(data: &[u8]) -> Result<SaleKick, DecodeError> {
    let d = decode(data, layouts::CLIP_KICK)?;
    Ok(SaleKick {
        id: d.uint("id")?,
        top: d.uint("top")?,
        tab: d.uint("tab")?,
        lot: d.uint("lot")?,
        usr: d.address("usr")?,
        kpr: d.address("kpr")?,
        coin: d.uint("coin")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::{BigInt, BigUint};
    use types::ids::{Address, TxHash};

    fn text_word(s: &str) -> Vec<u8> {
        let mut w = vec![0u8; 32];
        w[..s.len()].copy_from_slice(s.as_bytes());
        w
    }

    fn addr_word(a: Address) -> Vec<u8> {
        let mut w = vec![0u8; 32];
        w[12..].copy_from_slice(a.as_bytes());
        w
    }

    fn int_word(v: i64) -> Vec<u8> {
        let fill = if v < 0 { 0xff } else { 0x00 };
        let mut w = vec![fill; 32];
        w[24..].copy_from_slice(&v.to_be_bytes());
        w
    }

    fn note(source: ContractKind, selector: Selector, args: &[Vec<u8>]) -> LogEnvelope {
        let mut data = selector.to_vec();
        for a in args {
            data.extend_from_slice(a);
        }
        LogEnvelope {
            source,
            address: Address::new([0x35; 20]),
            block_number: 1,
            block_timestamp: 100,
            transaction_hash: TxHash::new([0x01; 32]),
            transaction_from: Address::new([0x02; 20]),
            log_index: 0,
            signature: Signature::Note {
                selector,
                caller: Address::new([0x07; 20]),
            },
            data,
        }
    }

    #[test]
    fn test_routes_init() {
        let env = note(ContractKind::Vat, INIT, &[text_word("ETH-A")]);
        assert_eq!(
            route(&env).unwrap(),
            Some(LedgerEvent::RegisterCollateralType { ilk: "ETH-A".into() })
        );
    }

    #[test]
    fn test_routes_frob_with_signed_deltas() {
        let urn = Address::new([0x11; 20]);
        let env = note(
            ContractKind::Vat,
            VAT_FROB,
            &[
                text_word("ETH-A"),
                addr_word(urn),
                addr_word(urn),
                addr_word(urn),
                int_word(10),
                int_word(-3),
            ],
        );
        match route(&env).unwrap() {
            Some(LedgerEvent::Frob(frob)) => {
                assert_eq!(frob.urn, urn);
                assert_eq!(frob.dink, BigInt::from(10));
                assert_eq!(frob.dart, BigInt::from(-3));
            }
            other => panic!("unexpected route: {:?}", other),
        }
    }

    #[test]
    fn test_truncated_frob_rejected() {
        let urn = Address::new([0x11; 20]);
        let env = note(
            ContractKind::Vat,
            VAT_FROB,
            &[text_word("ETH-A"), addr_word(urn), addr_word(urn), addr_word(urn), int_word(1)],
        );
        assert!(matches!(
            route(&env),
            Err(DecodeError::Truncated { field: "dart", need: 196, have: 164 })
        ));
    }

    #[test]
    fn test_routes_heal_amount() {
        let env = note(ContractKind::Vat, VAT_HEAL, &[int_word(9)]);
        assert_eq!(
            route(&env).unwrap(),
            Some(LedgerEvent::Heal(Heal { rad: BigUint::from(9u8) }))
        );
    }

    #[test]
    fn test_routes_spot_pip() {
        let env = note(
            ContractKind::Spot,
            SPOT_FILE_PIP,
            &[text_word("c1"), text_word("pip"), int_word(7)],
        );
        assert_eq!(
            route(&env).unwrap(),
            Some(LedgerEvent::SpotFilePip(FilePip {
                ilk: "c1".into(),
                val: BigUint::from(7u8),
            }))
        );
        // Only Spot files a price source.
        let env = note(
            ContractKind::Vat,
            SPOT_FILE_PIP,
            &[text_word("c1"), text_word("pip"), int_word(7)],
        );
        assert_eq!(route(&env).unwrap(), None);
    }

    #[test]
    fn test_file_overloads() {
        let env = note(
            ContractKind::Spot,
            FILE_ILK_UINT,
            &[text_word("ETH-A"), text_word("mat"), int_word(3)],
        );
        assert_eq!(
            route(&env).unwrap(),
            Some(LedgerEvent::File(FileParam {
                contract: ContractKind::Spot,
                ilk: Some("ETH-A".into()),
                what: "mat".into(),
                value: FileValue::Uint(BigUint::from(3u8)),
            }))
        );
    }

    #[test]
    fn test_same_selector_differs_by_source() {
        let env = note(ContractKind::Jug, INIT, &[text_word("ETH-A")]);
        assert_eq!(
            route(&env).unwrap(),
            Some(LedgerEvent::JugInit { ilk: "ETH-A".into() })
        );
    }

    #[test]
    fn test_unknown_selector_is_none() {
        let env = note(ContractKind::Vat, [0xde, 0xad, 0xbe, 0xef], &[]);
        assert_eq!(route(&env).unwrap(), None);
    }

    #[test]
    fn test_missing_selector() {
        let mut env = note(ContractKind::Vat, INIT, &[]);
        env.data.truncate(2);
        assert_eq!(route(&env).unwrap_err(), DecodeError::MissingSelector);
    }

    #[test]
    fn test_named_yank() {
        let mut env = note(ContractKind::Clipper, INIT, &[]);
        env.signature = Signature::Event(EventName::Yank);
        env.data = int_word(12);
        assert_eq!(
            route(&env).unwrap(),
            Some(LedgerEvent::SaleYank {
                id: BigUint::from(12u8)
            })
        );
    }
}
