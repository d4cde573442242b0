use reqwest::multipart::Form;

use crate::api::attachment::Attachment;
use crate::api::client::ApiClient;
use crate::api::endpoints::Endpoint;
use crate::api::errors::ApiError;
use crate::api::normalize;
use crate::schemas::PaymentRecord;

/// Text fields of the payment-proof form.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSubmission {
    pub student_id: String,
    pub student_name: String,
    pub curriculum: String,
    pub package: String,
    pub grade: String,
    pub subjects: Vec<String>,
    pub amount: f64,
    pub duration: String,
    pub reference_name: String,
    pub transaction_date: String,
}

impl PaymentSubmission {
    pub(crate) fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("studentId", self.student_id.clone()),
            ("studentName", self.student_name.clone()),
            ("curriculum", self.curriculum.clone()),
            ("package", self.package.clone()),
            ("grade", self.grade.clone()),
            ("subjects", self.subjects.join(",")),
            ("amount", format_amount(self.amount)),
            ("duration", self.duration.clone()),
            ("referenceName", self.reference_name.clone()),
            ("transactionDate", self.transaction_date.clone()),
        ]
    }
}

/// Whole amounts are sent without a fractional part ("300", not "300.0").
pub(crate) fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        amount.to_string()
    }
}

impl ApiClient {
    pub(crate) async fn submit_payment(
        &self,
        submission: &PaymentSubmission,
        screenshot: Attachment,
        token: Option<&str>,
    ) -> Result<Option<PaymentRecord>, ApiError> {
        let mut form = Form::new();
        for (name, value) in submission.fields() {
            form = form.text(name, value);
        }
        form = form.part("screenshot", screenshot.into_part()?);

        let body = self.send_multipart(&Endpoint::SubmitPayment, token, form).await?;
        Ok(normalize::record(&body, &["payment"]))
    }

    pub(crate) async fn payment_history(
        &self,
        student_id: &str,
        token: &str,
    ) -> Result<Vec<PaymentRecord>, ApiError> {
        let body = self.get(&Endpoint::StudentPayments(student_id.to_string()), Some(token)).await?;
        Ok(normalize::list(&body, &["payments"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_follow_form_order_and_join_subjects() {
        let submission = PaymentSubmission {
            student_id: "s1".into(),
            student_name: "Ama".into(),
            curriculum: "GES".into(),
            package: "GES-VC".into(),
            grade: "SHS 1".into(),
            subjects: vec!["Maths".into(), "English".into()],
            amount: 300.0,
            duration: "1 month".into(),
            reference_name: "Ama-1".into(),
            transaction_date: "2025-01-02T10:20:30Z".into(),
        };
        let fields = submission.fields();
        let names: Vec<_> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec![
                "studentId",
                "studentName",
                "curriculum",
                "package",
                "grade",
                "subjects",
                "amount",
                "duration",
                "referenceName",
                "transactionDate"
            ]
        );
        assert_eq!(fields[5].1, "Maths,English");
        assert_eq!(fields[6].1, "300");
    }

    #[test]
    fn amount_formatting() {
        assert_eq!(format_amount(120.0), "120");
        assert_eq!(format_amount(99.5), "99.5");
    }
}
