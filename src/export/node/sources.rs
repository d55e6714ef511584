//! 生成工程中与 agent 无关的 TypeScript 源码片段。
//!
//! agent 相关的数据全部在 `src/config.ts` 里，这些模块运行时从那里读取。

/// `src/config.ts` 的类型声明部分
pub const CONFIG_TYPES: &str = r#"export interface GlobalPrompt {
  id: string;
  label: string;
  key: string;
  content: string;
  [key: string]: unknown;
}

export interface LlmSettings {
  provider: string;
  model: string;
  apiKeyEnvVar: string;
  temperature: number;
  maxTokens: number;
  topK?: number;
  topP?: number;
  [key: string]: unknown;
}

export interface ToolSettings {
  id: string;
  name: string;
  slug: string;
  type: string;
  description: string;
  enabled: boolean;
  httpMethod?: string;
  httpUrl?: string;
  httpHeaders?: Record<string, string>;
  [key: string]: unknown;
}

export interface TaskSettings {
  id: string;
  name: string;
  description: string;
  expectedOutput: string;
  [key: string]: unknown;
}

export interface AgentConfig {
  id: string;
  name: string;
  slug: string;
  description: string;
  language: string;
  status: string;
  currentVersion: number;
  personaTone: string;
  emojiAllowed: boolean;
  greeting: string;
  baseInstructions: string;
  globalPrompts: GlobalPrompt[];
  llm: LlmSettings;
  tools: ToolSettings[];
  tasks: TaskSettings[];
  [key: string]: unknown;
}
"#;

/// 各供应商分支共用的开头，位于供应商 SDK 的 import 之后
pub const LLM_PRELUDE: &str = r#"import dotenv from "dotenv";
import { agentConfig } from "./config";

dotenv.config();

export interface ChatMessage {
  role: string;
  content: string;
}

export class MissingApiKeyError extends Error {
  constructor(envVar: string) {
    super(`Missing API Key: ${envVar}`);
    this.name = "MissingApiKeyError";
  }
}

function requireApiKey(): string {
  const envVar = agentConfig.llm.apiKeyEnvVar;
  const apiKey = process.env[envVar];
  if (!apiKey) throw new MissingApiKeyError(envVar);
  return apiKey;
}
"#;

pub const LLM_GOOGLE_IMPORT: &str = "import { GoogleGenAI } from \"@google/genai\";\n";

pub const LLM_GOOGLE: &str = r#"export async function generateResponse(messages: ChatMessage[]): Promise<string> {
  const ai = new GoogleGenAI({ apiKey: requireApiKey() });

  // Single-turn call: only the last message is sent, earlier turns are dropped.
  const lastMessage = messages.length > 0 ? messages[messages.length - 1].content : "";

  const response = await ai.models.generateContent({
    model: agentConfig.llm.model,
    contents: lastMessage,
    config: {
      systemInstruction: agentConfig.baseInstructions,
      temperature: agentConfig.llm.temperature,
      maxOutputTokens: agentConfig.llm.maxTokens,
    },
  });
  return response.text ?? "";
}
"#;

pub const LLM_OPENAI_IMPORT: &str = "import OpenAI from \"openai\";\n";

pub const LLM_OPENAI: &str = r#"export async function generateResponse(messages: ChatMessage[]): Promise<string> {
  const openai = new OpenAI({ apiKey: requireApiKey() });
  const systemMessage = { role: "system", content: agentConfig.baseInstructions };

  const response = await openai.chat.completions.create({
    model: agentConfig.llm.model,
    messages: [systemMessage, ...messages] as OpenAI.Chat.ChatCompletionMessageParam[],
    temperature: agentConfig.llm.temperature,
    max_tokens: agentConfig.llm.maxTokens,
  });
  return response.choices[0]?.message?.content ?? "";
}
"#;

pub const LLM_UNSUPPORTED: &str = r#"export class ProviderNotSupportedError extends Error {
  constructor(provider: string) {
    super(`Provider "${provider}" is not supported in this runtime export yet.`);
    this.name = "ProviderNotSupportedError";
  }
}

export async function generateResponse(_messages: ChatMessage[]): Promise<string> {
  throw new ProviderNotSupportedError(agentConfig.llm.provider);
}
"#;

pub const TOOLS_IMPORTS: &str = r#"import axios from "axios";
import { agentConfig, ToolSettings } from "./config";

export class ToolNotFoundError extends Error {
  constructor(slug: string) {
    super(`Tool ${slug} not found`);
    this.name = "ToolNotFoundError";
  }
}
"#;

/// 头部占位符解析；正则在导出时由 `ENV_PLACEHOLDER_PATTERN` 填入
pub const HEADER_RESOLVER: &str = r#"
// Returns undefined when a referenced variable is unset, so the header is omitted
// instead of sending the literal placeholder.
export function resolveHeaderValue(value: string): string | undefined {
  const unresolved: string[] = [];
  const resolved = value.replace(ENV_PLACEHOLDER, (_match: string, name: string) => {
    const envValue = process.env[name];
    if (!envValue) {
      unresolved.push(name);
      return "";
    }
    return envValue;
  });
  return unresolved.length > 0 ? undefined : resolved;
}

export function buildHeaders(tool: ToolSettings): Record<string, string> {
  const headers: Record<string, string> = {};
  for (const [key, value] of Object.entries(tool.httpHeaders ?? {})) {
    const resolved = resolveHeaderValue(value);
    if (resolved !== undefined) headers[key] = resolved;
  }
  return headers;
}
"#;

pub const TOOL_EXECUTOR: &str = r#"
export async function executeTool(slug: string, params: unknown): Promise<unknown> {
  const tool = agentConfig.tools.find((t) => t.slug === slug);
  if (!tool) throw new ToolNotFoundError(slug);

  if (tool.type !== "http" && tool.type !== "webhook") {
    return { error: "Tool type not implemented" };
  }

  console.log(`Executing HTTP Tool: ${tool.name}`);
  try {
    const response = await axios({
      method: tool.httpMethod ?? "POST",
      url: tool.httpUrl,
      headers: buildHeaders(tool),
      data: params,
    });
    return response.data;
  } catch (error: unknown) {
    const message = error instanceof Error ? error.message : String(error);
    console.error("Tool execution failed", message);
    return { error: message };
  }
}
"#;

pub const ENTRY_MODULE: &str = r#"import express, { Request, Response } from "express";
import cors from "cors";
import dotenv from "dotenv";
import { agentConfig } from "./config";
import { generateResponse } from "./llm";
import { executeTool } from "./tools";

dotenv.config();

const app = express();
app.use(cors());
app.use(express.json());

const PORT = process.env.PORT || 3000;

function errorMessage(error: unknown): string {
  return error instanceof Error ? error.message : String(error);
}

app.get("/", (_req: Request, res: Response) => {
  res.json({
    status: "running",
    agent: agentConfig.name,
    version: agentConfig.currentVersion,
  });
});

// Returns the model text only; tool calls in the reply are not detected or executed.
app.post("/chat", async (req: Request, res: Response) => {
  try {
    const { messages } = req.body ?? {};
    if (!messages || !Array.isArray(messages)) {
      return res.status(400).json({ error: "Messages array is required" });
    }

    console.log(`Received message for agent: ${agentConfig.name}`);
    const responseText = await generateResponse(messages);

    return res.json({
      response: responseText,
      agent: agentConfig.name,
    });
  } catch (error: unknown) {
    console.error("Error processing request:", error);
    return res.status(500).json({ error: errorMessage(error) });
  }
});

app.post("/tool/:slug", async (req: Request, res: Response) => {
  try {
    const result = await executeTool(req.params.slug, req.body);
    return res.json(result);
  } catch (error: unknown) {
    return res.status(500).json({ error: errorMessage(error) });
  }
});

app.listen(PORT, () => {
  console.log(`Agent "${agentConfig.name}" is running`);
  console.log(`Local: http://localhost:${PORT}`);
  console.log(`Slug: ${agentConfig.slug}`);
});
"#;
