//! Payment mode selector with the three sub-forms.
//!
//! DESIGN
//! ======
//! Holds one `PaymentSelection`; switching modes replaces the sub-form, so
//! nothing typed under one mode leaks into another. Mobile money asks for an
//! explicit confirmation before the payment is handed to `on_complete`.
//! A wire reference that differs from the published one only warns.

#[cfg(test)]
#[path = "payment_selector_test.rs"]
mod payment_selector_test;

use leptos::prelude::*;
use portal::notify::Notifier;
use portal::payment::{
    BankDepositForm, Carrier, MobileMoneyForm, PaymentMode, PaymentSelection, PaymentSubmission, WireTransferForm,
    format_amount,
};
use portal::types::BankDetails;

use crate::components::file_field::FileField;
use crate::state::ui::UiNotifier;

/// Whether the finalize button is enabled. Mobile money validates on click
/// instead, so its errors can be shown.
#[must_use]
pub fn finalize_enabled(selection: &PaymentSelection) -> bool {
    match selection {
        PaymentSelection::MobileMoney(_) => true,
        PaymentSelection::BankDeposit(form) => form.can_finalize(),
        PaymentSelection::WireTransfer(form) => form.can_finalize(),
    }
}

#[must_use]
pub fn finalize_label(mode: PaymentMode) -> &'static str {
    match mode {
        PaymentMode::MobileMoney => "Pay now",
        PaymentMode::BankDeposit | PaymentMode::WireTransfer => "Finalize payment",
    }
}

fn update_mobile(selection: RwSignal<PaymentSelection>, f: impl FnOnce(&mut MobileMoneyForm)) {
    selection.update(|s| {
        if let PaymentSelection::MobileMoney(form) = s {
            f(form);
        }
    });
}

fn update_deposit(selection: RwSignal<PaymentSelection>, f: impl FnOnce(&mut BankDepositForm)) {
    selection.update(|s| {
        if let PaymentSelection::BankDeposit(form) = s {
            f(form);
        }
    });
}

fn update_wire(selection: RwSignal<PaymentSelection>, f: impl FnOnce(&mut WireTransferForm)) {
    selection.update(|s| {
        if let PaymentSelection::WireTransfer(form) = s {
            f(form);
        }
    });
}

#[component]
pub fn PaymentSelector(
    amount: u64,
    bank: BankDetails,
    #[prop(into)] busy: Signal<bool>,
    on_complete: Callback<PaymentSubmission>,
) -> impl IntoView {
    let selection = RwSignal::new(PaymentSelection::default());
    let confirming = RwSignal::new(None::<String>);
    let notifier = UiNotifier::from_context();

    let mode = move || selection.with(PaymentSelection::mode);

    let finalize = move || match selection.with(|s| s.finalize(amount)) {
        Ok(submission) => on_complete.run(submission),
        Err(err) => notifier.error(&err.to_string()),
    };

    let on_finalize = move |_| {
        let pending = selection.with(|s| match s {
            PaymentSelection::MobileMoney(form) => Some(form.validate().map(|_| form.confirmation_text(amount))),
            _ => None,
        });
        match pending {
            Some(Ok(text)) => confirming.set(Some(text)),
            Some(Err(err)) => notifier.error(&err.to_string()),
            None => finalize(),
        }
    };

    let tabs = PaymentMode::ALL
        .into_iter()
        .map(|m| {
            view! {
                <button
                    class="payment-selector__tab"
                    class:payment-selector__tab--active=move || mode() == m
                    on:click=move |_| selection.update(|s| s.select(m))
                >
                    {m.label()}
                </button>
            }
        })
        .collect_view();

    let mobile_form = move || {
        let carriers = Carrier::ALL
            .into_iter()
            .map(|c| {
                let active = move || selection.with(|s| matches!(s, PaymentSelection::MobileMoney(f) if f.carrier == Some(c)));
                view! {
                    <button
                        class="payment-selector__carrier"
                        class:payment-selector__carrier--active=active
                        on:click=move |_| update_mobile(selection, |f| f.select_carrier(c))
                    >
                        {format!("{} ({})", c.label(), c.prefix())}
                    </button>
                }
            })
            .collect_view();
        let phone = move || match selection.get() {
            PaymentSelection::MobileMoney(f) => f.phone,
            _ => String::new(),
        };
        view! {
            <div class="payment-selector__form">
                <div class="payment-selector__carriers">{carriers}</div>
                <label class="form-field">
                    <span class="form-field__label">"Phone number"</span>
                    <input
                        type="tel"
                        inputmode="numeric"
                        prop:value=phone
                        on:input=move |ev| update_mobile(selection, |f| f.set_phone(&event_target_value(&ev)))
                    />
                </label>
            </div>
        }
    };

    let bank_block = {
        let bank = bank.clone();
        move || {
            view! {
                <dl class="payment-selector__bank">
                    <dt>"Bank"</dt>
                    <dd>{bank.bank_name.clone()}</dd>
                    <dt>"Account holder"</dt>
                    <dd>{bank.account_holder.clone()}</dd>
                    <dt>"Account reference"</dt>
                    <dd>{bank.account_reference.clone()}</dd>
                </dl>
            }
        }
    };

    let deposit_form = {
        let bank_block = bank_block.clone();
        move || {
            let receipt = Signal::derive(move || match selection.get() {
                PaymentSelection::BankDeposit(f) => f.receipt,
                _ => None,
            });
            view! {
                <div class="payment-selector__form">
                    {bank_block()}
                    <FileField
                        label="Deposit receipt"
                        accept="application/pdf,image/*"
                        file=receipt
                        on_pick=Callback::new(move |file| update_deposit(selection, |f| f.receipt = file))
                    />
                </div>
            }
        }
    };

    let wire_form = {
        let published = bank.account_reference.clone();
        move || {
            let published = published.clone();
            let reference = move || match selection.get() {
                PaymentSelection::WireTransfer(f) => f.reference,
                _ => String::new(),
            };
            let mismatch = move || {
                selection.with(|s| matches!(s, PaymentSelection::WireTransfer(f) if f.reference_mismatch(&published)))
            };
            let proof = Signal::derive(move || match selection.get() {
                PaymentSelection::WireTransfer(f) => f.proof,
                _ => None,
            });
            view! {
                <div class="payment-selector__form">
                    {bank_block()}
                    <label class="form-field">
                        <span class="form-field__label">"Account reference used"</span>
                        <input
                            type="text"
                            prop:value=reference
                            on:input=move |ev| update_wire(selection, |f| f.reference = event_target_value(&ev))
                        />
                    </label>
                    <Show when=mismatch>
                        <p class="payment-selector__warning">
                            "This reference differs from the published account. Interbank fees may apply."
                        </p>
                    </Show>
                    <FileField
                        label="Proof of transfer"
                        accept="application/pdf,image/*"
                        file=proof
                        on_pick=Callback::new(move |file| update_wire(selection, |f| f.proof = file))
                    />
                </div>
            }
        }
    };

    let fees = move || selection.with(|s| s.fees(amount));

    view! {
        <section class="payment-selector">
            <div class="payment-selector__tabs">{tabs}</div>
            {move || match mode() {
                PaymentMode::MobileMoney => mobile_form().into_any(),
                PaymentMode::BankDeposit => deposit_form().into_any(),
                PaymentMode::WireTransfer => wire_form().into_any(),
            }}
            <dl class="payment-selector__fees">
                <dt>"Amount"</dt>
                <dd>{move || format_amount(fees().amount)}</dd>
                <dt>"Fees"</dt>
                <dd>{move || format_amount(fees().fee)}</dd>
                <dt>"Total"</dt>
                <dd>{move || format_amount(fees().total)}</dd>
            </dl>
            <button
                class="btn btn--primary payment-selector__finalize"
                disabled=move || busy.get() || !selection.with(finalize_enabled)
                on:click=on_finalize
            >
                {move || finalize_label(mode())}
            </button>
            {move || {
                confirming
                    .get()
                    .map(|text| {
                        view! {
                            <div class="alert-modal__backdrop">
                                <div class="alert-modal" role="dialog">
                                    <h2 class="alert-modal__title">"Confirm payment"</h2>
                                    <p>{text}</p>
                                    <div class="alert-modal__actions">
                                        <button class="btn" on:click=move |_| confirming.set(None)>
                                            "Cancel"
                                        </button>
                                        <button
                                            class="btn btn--primary"
                                            on:click=move |_| {
                                                confirming.set(None);
                                                finalize();
                                            }
                                        >
                                            "Confirm"
                                        </button>
                                    </div>
                                </div>
                            </div>
                        }
                    })
            }}
        </section>
    }
}
