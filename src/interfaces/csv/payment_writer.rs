use crate::domain::payment::{Money, Payment};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct PaymentRow<'a> {
    token: &'a str,
    variant: &'a str,
    status: &'a str,
    currency: &'a str,
    total: Money,
    delivery: Money,
    tax: Money,
}

impl<'a> From<&'a Payment> for PaymentRow<'a> {
    fn from(payment: &'a Payment) -> Self {
        Self {
            token: payment.token(),
            variant: &payment.variant,
            status: payment.status().as_str(),
            currency: &payment.currency,
            total: payment.total,
            delivery: payment.delivery,
            tax: payment.tax,
        }
    }
}

/// Writes payments as CSV, one row per payment, with a header row.
pub struct PaymentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_payments<'a, I>(&mut self, payments: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Payment>,
    {
        let mut wrote_any = false;
        for payment in payments {
            self.writer.serialize(PaymentRow::from(payment))?;
            wrote_any = true;
        }
        if !wrote_any {
            self.writer.write_record([
                "token", "variant", "status", "currency", "total", "delivery", "tax",
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
