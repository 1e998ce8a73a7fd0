//! Banners for the spending insights of the current month.

use maud::{Markup, html};

use crate::analytics::{Insight, InsightKind};

const ALERT_BANNER_STYLE: &str = "p-4 text-sm text-red-800 rounded-lg bg-red-50 \
    dark:bg-gray-800 dark:text-red-400";
const SUCCESS_BANNER_STYLE: &str = "p-4 text-sm text-green-800 rounded-lg bg-green-50 \
    dark:bg-gray-800 dark:text-green-400";
const INFO_BANNER_STYLE: &str = "p-4 text-sm text-blue-800 rounded-lg bg-blue-50 \
    dark:bg-gray-800 dark:text-blue-400";

pub(super) fn insights_view(insights: &[Insight]) -> Markup {
    html! {
        section id="insights" class="w-full mb-8 space-y-3"
        {
            h2 class="text-xl font-semibold mb-4" { "Análise Proativa e Insights" }

            @for insight in insights {
                @match insight.kind {
                    InsightKind::Alert => {
                        div class=(ALERT_BANNER_STYLE) role="alert" data-insight="alert"
                        {
                            span class="font-medium" { "🚨 Alerta: " }
                            (insight.message)
                        }
                    }
                    InsightKind::Success => {
                        div class=(SUCCESS_BANNER_STYLE) role="status" data-insight="success"
                        {
                            span class="font-medium" { "🎉 Sucesso: " }
                            (insight.message)
                        }
                    }
                }
            }

            @if insights.is_empty() {
                div class=(INFO_BANNER_STYLE) role="status"
                {
                    "Nenhum alerta ou sucesso detectado neste mês. Os gastos estão na média."
                }
            }
        }
    }
}

/// The banner shown when the transactions could not be loaded.
pub(super) fn load_error_view() -> Markup {
    html! {
        div class={(ALERT_BANNER_STYLE) " mb-4 w-full"} role="alert" id="load-error"
        {
            span class="font-medium" { "Erro ao carregar dados. " }
            "Verifique a conexão com o banco de dados e os logs do servidor."
        }
    }
}

/// The message shown when there are no transactions yet.
pub(super) fn empty_state_view() -> Markup {
    html! {
        div class={(INFO_BANNER_STYLE) " w-full"} role="status" id="empty-state"
        {
            "Nenhum dado encontrado. Use a barra lateral para adicionar dados."
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        analytics::{Insight, InsightKind},
        dashboard::insights::insights_view,
    };

    #[test]
    fn renders_one_banner_per_insight() {
        let insights = [
            Insight {
                kind: InsightKind::Alert,
                category: "Lazer".to_owned(),
                current_total: 130.0,
                average: 100.0,
                percentage: 30.0,
                message: "Lazer 30% ACIMA".to_owned(),
            },
            Insight {
                kind: InsightKind::Success,
                category: "Mercado".to_owned(),
                current_total: 70.0,
                average: 100.0,
                percentage: 30.0,
                message: "Mercado 30% ABAIXO".to_owned(),
            },
        ];

        let html = Html::parse_fragment(&insights_view(&insights).into_string());

        let alerts = html
            .select(&Selector::parse("[data-insight=alert]").unwrap())
            .collect::<Vec<_>>();
        let successes = html
            .select(&Selector::parse("[data-insight=success]").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(alerts.len(), 1);
        assert_eq!(successes.len(), 1);
        assert!(alerts[0].text().collect::<String>().contains("Lazer 30% ACIMA"));
    }

    #[test]
    fn renders_neutral_message_without_insights() {
        let text = insights_view(&[]).into_string();

        assert!(text.contains("Os gastos estão na média."));
    }
}
