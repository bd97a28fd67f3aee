use portal::attachment::Attachment;

use super::*;

#[test]
fn mobile_money_button_is_always_enabled() {
    assert!(finalize_enabled(&PaymentSelection::default()));
}

#[test]
fn deposit_needs_a_receipt() {
    let mut selection = PaymentSelection::default();
    selection.select(PaymentMode::BankDeposit);
    assert!(!finalize_enabled(&selection));

    if let PaymentSelection::BankDeposit(form) = &mut selection {
        form.receipt = Some(Attachment::new("recu.pdf", "application/pdf", vec![1]));
    }
    assert!(finalize_enabled(&selection));
}

#[test]
fn wire_needs_reference_and_proof() {
    let mut selection = PaymentSelection::default();
    selection.select(PaymentMode::WireTransfer);
    if let PaymentSelection::WireTransfer(form) = &mut selection {
        form.reference = "CG39 3001 1000".into();
    }
    assert!(!finalize_enabled(&selection));

    if let PaymentSelection::WireTransfer(form) = &mut selection {
        form.proof = Some(Attachment::new("virement.pdf", "application/pdf", vec![1]));
    }
    assert!(finalize_enabled(&selection));
}

#[test]
fn labels_follow_mode() {
    assert_eq!(finalize_label(PaymentMode::MobileMoney), "Pay now");
    assert_eq!(finalize_label(PaymentMode::WireTransfer), "Finalize payment");
}
