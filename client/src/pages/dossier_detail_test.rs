use portal::types::DossierStatus;

use super::*;

#[test]
fn only_awaiting_payment_links_to_payment() {
    let mut detail = DossierDetail { id: "12".into(), status: DossierStatus::AwaitingPayment, ..DossierDetail::default() };
    assert_eq!(payment_link(&detail).as_deref(), Some("/dossiers/12/payment"));

    detail.status = DossierStatus::InReview;
    assert_eq!(payment_link(&detail), None);
}
