//! 基础提示词：系统人设与整篇评分

use crate::config::AppConfig;

/// 系统提示词：作者人设、写作特点与风格要求
pub fn system_prompt(cfg: &AppConfig) -> String {
    let prefs = cfg
        .author
        .preferences
        .iter()
        .map(|p| format!("- {}", p))
        .collect::<Vec<_>>()
        .join("\n");
    let techniques = cfg.style.narrative_technique.join("、");
    let focuses = cfg.style.description_focus.join("、");
    let style_reference = if cfg.novel.style_reference.is_empty() {
        "无".to_string()
    } else {
        cfg.novel.style_reference.clone()
    };

    format!(
        r#"你是一位{role}，{description}

写作特点：
{prefs}

写作手法：
- 采用{perspective}视角叙述
- 使用{tense}进行叙述
- 整体语气{tone}
- 运用{techniques}等叙事技巧
- 对话风格{dialogue}
- 重点描写{focuses}

参考风格：{style_reference}

写作要求：
1. 保持原创性，避免抄袭
2. 符合目标读者的阅读习惯
3. 注重故事的完整性和逻辑性
4. 通过细腻的描写展现人物性格
5. 善于运用对话推动情节发展
6. 严格使用中文创作
7. 避免内容重复，每个段落都要推进故事发展
8. 始终保持{perspective}的叙述视角

语言风格：
- 精炼不冗长
- 重视细节描写
- 善用对话刻画人物
- 注重场景氛围营造"#,
        role = cfg.author.role,
        description = cfg.author.description,
        prefs = prefs,
        perspective = cfg.style.narrative_perspective,
        tense = cfg.style.tense,
        tone = cfg.style.tone,
        techniques = techniques,
        dialogue = cfg.style.dialogue_style,
        focuses = focuses,
        style_reference = style_reference,
    )
}

/// 评分提示词：要求按固定格式输出各维度分析并以 "总分：x/100" 收尾
pub fn rating_prompt() -> String {
    r#"请对小说进行全面评分，评分标准如下：

1. 情节发展（20分）：故事结构的完整性、情节发展的合理性、冲突设置、节奏把控
2. 人物塑造（30分）：性格一致性（10分）、行为合理性（10分）、对话特色（5分）、成长体现（5分）
3. 主题表达（20分）：主题的明确性与深度、价值观传达、情感感染力
4. 写作技巧（30分）：叙事视角运用、场景描写、语言风格统一、细节刻画

请按以下格式输出评分和分析：

## 情节发展（x/20分）
[详细分析]

## 人物塑造（x/30分）
[详细分析]

## 主题表达（x/20分）
[详细分析]

## 写作技巧（x/30分）
[详细分析]

总分：x/100"#
        .to_string()
}

/// 评分用户提示词：附上待评分正文
pub fn rating_user_prompt(content: &str) -> String {
    format!("请对以下小说内容进行评分：\n\n{}", content)
}
